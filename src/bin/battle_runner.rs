//! Headless Battle Runner
//!
//! Sets up a player and an NPC in an in-memory repository, fights one
//! battle and prints the resulting record.

use armada::battle::{BattleRequest, BattleService};
use armada::combat::RandSource;
use armada::core::error::Result;
use armada::core::types::{AccountId, ShipNumber, TemplateId};
use armada::core::{config, load_config, set_config};
use armada::storage::MemoryRepository;
use armada::storage::Repository;
use clap::{Parser, ValueEnum};
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::EnvFilter;

/// Headless Battle Runner - one player vs NPC battle
#[derive(Parser, Debug)]
#[command(name = "battle_runner")]
#[command(about = "Fight a single fleet battle and print the battle record")]
struct Args {
    /// Player nickname
    #[arg(long, default_value = "commander")]
    player: String,

    /// NPC nickname (should carry the NPC prefix)
    #[arg(long, default_value = "npc_raider")]
    npc: String,

    /// Player formation: AGGRESSIVE, DEFENSIVE or TACTICAL
    #[arg(long)]
    formation_a: Option<String>,

    /// NPC formation
    #[arg(long)]
    formation_b: Option<String>,

    /// Catalog template for the player's ships
    #[arg(long, default_value_t = 2)]
    template_a: u32,

    /// Catalog template for the NPC's ships
    #[arg(long, default_value_t = 1)]
    template_b: u32,

    /// Ships per side (capped by the Ensign active-ship limit)
    #[arg(long, default_value_t = 3)]
    ships: usize,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Engine config file; defaults are used when absent
    #[arg(long)]
    config: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Print the ship catalog and exit
    #[arg(long)]
    list_templates: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Text,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("armada=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if let Some(path) = &args.config {
        if set_config(load_config(path)?).is_err() {
            tracing::warn!("engine config already installed, ignoring {}", path);
        }
    }
    let seed = args.seed.unwrap_or_else(rand::random);

    let mut service = BattleService::with_rng(
        MemoryRepository::with_starter_catalog(),
        config().clone(),
        RandSource::<ChaCha8Rng>::seeded(seed),
    );

    if args.list_templates {
        for template in service.repository().templates()? {
            let s = template.stats;
            println!(
                "{:>3}  {:<12} atk {:>5.1}  shd {:>5.1}  eva {:.2}  rof {:.1}  hp {:>6.1}  cost {:>7.1}",
                template.id.0, template.name, s.attack, s.shield, s.evasion, s.fire_rate, s.hp, s.value
            );
        }
        return Ok(());
    }

    let player = service.register_account(&args.player, 1_000_000.0)?;
    let npc = service.register_account(&args.npc, 1_000_000.0)?;
    let ships_a = commission(&mut service, player.id, TemplateId(args.template_a), args.ships)?;
    let ships_b = commission(&mut service, npc.id, TemplateId(args.template_b), args.ships)?;

    let request = BattleRequest::new(player.id, ships_a, npc.id, ships_b)
        .with_formation_tags(args.formation_a.as_deref(), args.formation_b.as_deref())?;
    let (record, message) = service.resolve_battle(&request)?;

    match args.format {
        OutputFormat::Text => {
            println!("Battle Result");
            println!("=============");
            for line in &record.battle_log {
                println!("{}", line);
            }
            println!();
            println!("{}", message);
            println!("Seed: {}", seed);
        }
        OutputFormat::Json => {
            println!("{}", record.to_json()?);
        }
    }
    Ok(())
}

/// Buy and activate `count` ships of one template
fn commission(
    service: &mut BattleService<MemoryRepository, RandSource<ChaCha8Rng>>,
    account: AccountId,
    template: TemplateId,
    count: usize,
) -> Result<Vec<ShipNumber>> {
    let mut numbers = Vec::with_capacity(count);
    for _ in 0..count {
        let (ship, _) = service.purchase_ship(account, template)?;
        service.set_ship_active(account, ship.ship_number)?;
        numbers.push(ship.ship_number);
    }
    Ok(numbers)
}
