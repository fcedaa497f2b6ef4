use clap::Parser;

use sym_rs::context::Context;
use sym_rs::reference::ExprRef;

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Number of boolean atoms.
    #[arg(long, value_name = "INT", default_value = "4")]
    atoms: usize,

    /// Seed for picking the minterms of the input function.
    #[arg(long, value_name = "INT", default_value = "42")]
    seed_minterms: u64,

    /// Log level.
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: simplelog::LevelFilter,
}

/// Minterms picked by a linear congruential generator, about half of all rows.
fn pick_minterms(n: usize, seed: u64) -> Vec<u64> {
    let mut state = seed;
    (0..1u64 << n)
        .filter(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            state >> 63 == 1
        })
        .collect()
}

/// Sum of full minterms over `atoms`, first atom as the most significant bit.
fn from_minterms(ctx: &Context, atoms: &[ExprRef], minterms: &[u64]) -> color_eyre::Result<ExprRef> {
    let n = atoms.len();
    let mut terms = Vec::new();
    for &m in minterms {
        let mut literals = Vec::new();
        for (i, &a) in atoms.iter().enumerate() {
            if m >> (n - 1 - i) & 1 == 1 {
                literals.push(a);
            } else {
                literals.push(ctx.not(a)?);
            }
        }
        terms.push(ctx.and(literals)?);
    }
    Ok(ctx.or(terms)?)
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    simplelog::TermLogger::init(
        args.log_level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    println!("args = {:?}", args);

    let time_total = std::time::Instant::now();

    let ctx = Context::default();
    let atoms: Vec<ExprRef> = (0..args.atoms).map(|i| ctx.symbol(&format!("x{}", i))).collect();
    let minterms = pick_minterms(args.atoms, args.seed_minterms);
    println!("minterms = {:?}", minterms);

    let f = from_minterms(&ctx, &atoms, &minterms)?;
    println!("f = {}", ctx.tostr(f));

    let table = ctx.truth_table(f, Some(&atoms))?;
    let m = ctx.minimize(f)?;
    println!("minimized = {}", ctx.tostr(m));

    let check = ctx.truth_table(m, Some(&atoms))?;
    if check != table {
        color_eyre::eyre::bail!("minimized form has a different truth table");
    }
    println!("truth tables agree on {} rows", table.rows.len());

    println!("ctx = {:?}", ctx);
    for stats in ctx.cache_stats() {
        println!(
            "cache {}: {} entries, {} hits, {} misses",
            stats.constructor, stats.entries, stats.hits, stats.misses
        );
    }

    let time_total = time_total.elapsed();
    println!("Done in {:.3} s", time_total.as_secs_f64());

    Ok(())
}
