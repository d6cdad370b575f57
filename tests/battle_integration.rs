//! Battle resolution integration tests

use armada::battle::*;
use armada::combat::*;
use armada::core::error::ArmadaError;
use armada::core::types::{AccountId, ShipNumber, Side, TemplateId};
use armada::core::EngineConfig;
use armada::fleet::{ShipStatus, ShipTemplate, StatBundle};
use armada::progression::Rank;
use armada::storage::{MemoryRepository, Repository};
use proptest::prelude::*;

/// No dodges, no damage variance, first live target
struct Steady;

impl CombatRng for Steady {
    fn chance(&mut self) -> f64 {
        0.999
    }

    fn uniform(&mut self, _lo: f64, _hi: f64) -> f64 {
        1.0
    }

    fn index(&mut self, _len: usize) -> usize {
        0
    }
}

fn arm<G: CombatRng>(
    service: &mut BattleService<MemoryRepository, G>,
    account: AccountId,
    template: TemplateId,
    count: usize,
) -> Vec<ShipNumber> {
    (0..count)
        .map(|_| {
            let (ship, _) = service.purchase_ship(account, template).unwrap();
            service.set_ship_active(account, ship.ship_number).unwrap();
            ship.ship_number
        })
        .collect()
}

#[test]
fn test_duel_against_npc() {
    let mut repo = MemoryRepository::new();
    repo.insert_template(ShipTemplate::new(
        TemplateId(10),
        "Lancer",
        StatBundle::new(20.0, 10.0, 0.0, 2.0, 100.0, 1000.0),
    ))
    .unwrap();
    repo.insert_template(ShipTemplate::new(
        TemplateId(11),
        "Skiff",
        StatBundle::new(5.0, 0.0, 0.0, 1.0, 50.0, 500.0),
    ))
    .unwrap();
    let mut service = BattleService::with_rng(repo, EngineConfig::default(), Steady);

    let player = service.register_account("ace", 1000.0).unwrap();
    let npc = service.register_account("NPC_Pirate", 500.0).unwrap();
    let ships_a = arm(&mut service, player.id, TemplateId(10), 1);
    let ships_b = arm(&mut service, npc.id, TemplateId(11), 1);

    let request = BattleRequest::new(player.id, ships_a, npc.id, ships_b)
        .with_formation_tags(Some("aggressive"), Some("AGGRESSIVE"))
        .unwrap();
    let (record, _) = service.resolve_battle(&request).unwrap();

    // Round 1: 40 damage, the skiff survives and answers. Its 5 attack
    // against shield 10 floors at 1 damage.
    let round_one = record
        .battle_log
        .iter()
        .position(|l| l == "--- Round 1 ---")
        .unwrap();
    let round_two = record
        .battle_log
        .iter()
        .position(|l| l == "--- Round 2 ---")
        .unwrap();
    assert!(record.battle_log[round_one..round_two]
        .iter()
        .any(|l| l.contains("NPC_Pirate")));

    assert_eq!(record.winner_account_id, player.id);
    assert_eq!(record.extra.rounds_fought, 2);
    assert_eq!(record.extra.total_damage[&player.id], 60.0);
    assert_eq!(record.extra.total_damage[&npc.id], 1.0);
    assert_eq!(record.extra.final_hp[&player.id], vec![99.0]);
    assert_eq!(record.extra.final_hp[&npc.id], vec![0.0]);
    assert_eq!(record.extra.formations[&npc.id], Formation::Aggressive);
    assert_eq!(record.extra.experience_gained[&npc.id], 0.0);
    assert_eq!(record.extra.currency_reward, 50.0);

    let repo = service.repository();
    let lancer = repo.ship_by_number(player.id, 1).unwrap().unwrap();
    assert_eq!(lancer.status, ShipStatus::Active);
    assert!((lancer.current.hp - 99.0).abs() < 1e-9);
    assert!((lancer.current.attack - 19.8).abs() < 1e-9);
    assert_eq!(lancer.baseline.hp, 100.0);

    let skiff = repo.ship_by_number(npc.id, 1).unwrap().unwrap();
    assert_eq!(skiff.status, ShipStatus::Active);
    assert_eq!(skiff.current, skiff.baseline);

    let ace = repo.account(player.id).unwrap().unwrap();
    assert_eq!(ace.currency, 50.0);
    assert_eq!(ace.elo, 1016.0);
    assert_eq!(ace.ships_destroyed, 1);
}

#[test]
fn test_rank_bonus_applies_in_battle_only() {
    let mut repo = MemoryRepository::new();
    repo.insert_template(ShipTemplate::new(
        TemplateId(1),
        "Warden",
        StatBundle::new(20.0, 0.0, 0.0, 1.0, 100.0, 1000.0),
    ))
    .unwrap();
    repo.insert_template(ShipTemplate::new(
        TemplateId(2),
        "Brute",
        StatBundle::new(10.0, 0.0, 0.0, 1.0, 42.0, 500.0),
    ))
    .unwrap();
    let mut service = BattleService::with_rng(repo, EngineConfig::default(), Steady);

    let player = service.register_account("ace", 1000.0).unwrap();
    let npc = service.register_account("npc_brute", 500.0).unwrap();
    let lieutenant = service
        .repository()
        .account(player.id)
        .unwrap()
        .unwrap()
        .with_experience(1600.0, service.config());
    assert_eq!(lieutenant.rank, Rank::Lieutenant);
    service.repository_mut().save_account(lieutenant).unwrap();

    let ships_a = arm(&mut service, player.id, TemplateId(1), 1);
    let ships_b = arm(&mut service, npc.id, TemplateId(2), 1);
    let (record, _) = service
        .resolve_battle(&BattleRequest::new(player.id, ships_a, npc.id, ships_b))
        .unwrap();

    // +5% on the Lieutenant's ship: 21 attack, 105 HP, still one shot per round
    let warden = record.participants_of(player.id).next().unwrap();
    assert!((warden.attack - 21.0).abs() < 1e-9);
    assert!((warden.hp - 105.0).abs() < 1e-9);
    assert!((warden.value - 1050.0).abs() < 1e-9);
    let brute = record.participants_of(npc.id).next().unwrap();
    assert_eq!(brute.hp, 42.0);

    // Round 1: 21 dealt, 10 taken. Round 2: the brute dies before answering.
    assert_eq!(record.winner_account_id, player.id);
    assert_eq!(record.extra.rounds_fought, 2);
    assert!((record.extra.final_hp[&player.id][0] - 95.0).abs() < 1e-9);

    let stored = service
        .repository()
        .ship_by_number(player.id, 1)
        .unwrap()
        .unwrap();
    assert_eq!(stored.baseline, StatBundle::new(20.0, 0.0, 0.0, 1.0, 100.0, 1000.0));
    assert!((stored.current.hp - 95.0).abs() < 1e-9);
    assert!((stored.current.attack - 20.0 * 95.0 / 105.0).abs() < 1e-9);
    assert!(stored.invariants_hold());
}

#[test]
fn test_human_loss_destroys_ship() {
    let mut service = BattleService::with_rng(
        MemoryRepository::with_starter_catalog(),
        EngineConfig::default(),
        Steady,
    );
    let rookie = service.register_account("rookie", 1000.0).unwrap();
    let veteran = service.register_account("veteran", 10_000.0).unwrap();
    let ships_a = arm(&mut service, rookie.id, TemplateId(1), 1);
    let ships_b = arm(&mut service, veteran.id, TemplateId(3), 1);

    let request = BattleRequest::new(rookie.id, ships_a, veteran.id, ships_b);
    let (record, _) = service.resolve_battle(&request).unwrap();
    assert_eq!(record.winner_account_id, veteran.id);

    let scout = service
        .repository()
        .ship_by_number(rookie.id, 1)
        .unwrap()
        .unwrap();
    assert_eq!(scout.status, ShipStatus::Destroyed);
    assert!(scout.current.is_zeroed());

    // A destroyed ship cannot fight again until repaired and reactivated
    let rematch = BattleRequest::new(rookie.id, vec![1], veteran.id, vec![1]);
    assert!(matches!(
        service.resolve_battle(&rematch),
        Err(ArmadaError::ShipNotActive { status: ShipStatus::Destroyed, .. })
    ));

    let rookie_after = service.repository().account(rookie.id).unwrap().unwrap();
    assert_eq!(rookie_after.losses, 1);
    assert_eq!(rookie_after.ships_lost, 1);
    assert_eq!(rookie_after.experience, 50.0);
}

#[test]
fn test_round_cap_decides_on_damage() {
    let mut config = EngineConfig::default();
    config.max_rounds = 3;
    let mut repo = MemoryRepository::new();
    repo.insert_template(ShipTemplate::new(
        TemplateId(1),
        "Bulwark",
        StatBundle::new(2.0, 0.0, 0.0, 1.0, 1000.0, 100.0),
    ))
    .unwrap();
    repo.insert_template(ShipTemplate::new(
        TemplateId(2),
        "Needle",
        StatBundle::new(3.0, 0.0, 0.0, 1.0, 1000.0, 100.0),
    ))
    .unwrap();
    let mut service = BattleService::with_rng(repo, config, Steady);

    let a = service.register_account("a", 1000.0).unwrap();
    let b = service.register_account("b", 1000.0).unwrap();
    let ships_a = arm(&mut service, a.id, TemplateId(1), 1);
    let ships_b = arm(&mut service, b.id, TemplateId(2), 1);

    let (record, _) = service
        .resolve_battle(&BattleRequest::new(a.id, ships_a, b.id, ships_b))
        .unwrap();

    assert_eq!(record.extra.rounds_fought, 3);
    assert_eq!(record.winner_account_id, b.id);
    assert_eq!(record.extra.decided_by, Some(VictoryReason::Damage));
}

#[test]
fn test_history_is_per_account() {
    let mut service = BattleService::with_rng(
        MemoryRepository::with_starter_catalog(),
        EngineConfig::default(),
        RandSource::seeded(7),
    );
    let a = service.register_account("a", 10_000.0).unwrap();
    let b = service.register_account("npc_b", 1000.0).unwrap();
    let c = service.register_account("c", 10_000.0).unwrap();

    let ships_a = arm(&mut service, a.id, TemplateId(2), 1);
    let ships_c = arm(&mut service, c.id, TemplateId(2), 1);
    let npc_ships = arm(&mut service, b.id, TemplateId(1), 2);

    service
        .resolve_battle(&BattleRequest::new(a.id, ships_a, b.id, vec![npc_ships[0]]))
        .unwrap();
    service
        .resolve_battle(&BattleRequest::new(c.id, ships_c, b.id, vec![npc_ships[1]]))
        .unwrap();

    assert_eq!(service.battle_history(a.id).unwrap().len(), 1);
    assert_eq!(service.battle_history(c.id).unwrap().len(), 1);
    assert_eq!(service.battle_history(b.id).unwrap().len(), 2);
}

fn arb_stats() -> impl Strategy<Value = StatBundle> {
    (1.0f64..40.0, 0.0f64..30.0, 0.0f64..0.6, 0.0f64..4.0, 1.0f64..300.0, 10.0f64..3000.0)
        .prop_map(|(attack, shield, evasion, fire_rate, hp, value)| {
            StatBundle::new(attack, shield, evasion, fire_rate, hp, value)
        })
}

fn arb_formation() -> impl Strategy<Value = Formation> {
    prop::sample::select(Formation::ALL.to_vec())
}

fn combat_fleet(side: Side, formation: Formation, stats: &[StatBundle]) -> CombatFleet {
    let owner = AccountId::new();
    let ships = stats
        .iter()
        .enumerate()
        .map(|(i, s)| CombatShip::new(owner, "pilot", i as u32 + 1, "Hull", *s))
        .collect();
    CombatFleet::new(side, formation, ships)
}

proptest! {
    #[test]
    fn prop_battle_terminates_with_winner(
        stats_a in prop::collection::vec(arb_stats(), 1..5),
        stats_b in prop::collection::vec(arb_stats(), 1..5),
        formation_a in arb_formation(),
        formation_b in arb_formation(),
        seed in any::<u64>(),
    ) {
        let config = EngineConfig::default();
        let mut rng = RandSource::seeded(seed);
        let mut fleet_a = combat_fleet(Side::A, formation_a, &stats_a);
        let mut fleet_b = combat_fleet(Side::B, formation_b, &stats_b);

        let report = resolve_fleet_combat(&mut fleet_a, &mut fleet_b, &config, &mut rng);
        let (winner, reason) = decide_winner(&fleet_a, &fleet_b, &report, &mut rng);

        prop_assert!(report.rounds_fought <= config.max_rounds);
        prop_assert!(report.damage_a >= 0.0 && report.damage_b >= 0.0);
        for ship in fleet_a.ships.iter().chain(fleet_b.ships.iter()) {
            prop_assert!(ship.current_hp <= ship.stats.hp);
        }
        prop_assert!(report.damage_a + 1e-6 >= fleet_b.starting_hp() - fleet_b.remaining_hp());
        prop_assert!(report.damage_b + 1e-6 >= fleet_a.starting_hp() - fleet_a.remaining_hp());

        if report.rounds_fought < config.max_rounds {
            prop_assert!(fleet_a.is_wiped_out() || fleet_b.is_wiped_out());
        }
        if reason == VictoryReason::LastFleetStanding {
            let survivor = match winner {
                Side::A => &fleet_a,
                Side::B => &fleet_b,
            };
            prop_assert!(!survivor.is_wiped_out());
        }
    }

    #[test]
    fn prop_persisted_ships_stay_consistent(
        stats_a in arb_stats(),
        stats_b in arb_stats(),
        count_a in 1usize..4,
        count_b in 1usize..4,
        seed in any::<u64>(),
    ) {
        let mut repo = MemoryRepository::new();
        repo.insert_template(ShipTemplate::new(TemplateId(1), "Alpha", stats_a)).unwrap();
        repo.insert_template(ShipTemplate::new(TemplateId(2), "Beta", stats_b)).unwrap();
        let mut service =
            BattleService::with_rng(repo, EngineConfig::default(), RandSource::seeded(seed));

        let a = service.register_account("alpha", 1e7).unwrap();
        let b = service.register_account("beta", 1e7).unwrap();
        let ships_a = arm(&mut service, a.id, TemplateId(1), count_a);
        let ships_b = arm(&mut service, b.id, TemplateId(2), count_b);

        let (record, _) = service
            .resolve_battle(&BattleRequest::new(a.id, ships_a, b.id, ships_b))
            .unwrap();
        prop_assert!(record.winner_account_id == a.id || record.winner_account_id == b.id);

        let elo_sum: f64 = record.extra.elo_change.values().sum();
        prop_assert!(elo_sum.abs() < 1e-6);

        for owner in [a.id, b.id] {
            for ship in service.repository().ships_of(owner).unwrap() {
                prop_assert!(ship.invariants_hold());
                prop_assert!(matches!(ship.status, ShipStatus::Active | ShipStatus::Destroyed));
            }
        }
    }
}
