use clap::Parser;
use clap::ValueEnum;
use eqhash::EqualityComparator;
use eqhash::HashMap;
use eqhash::HashSet;
use eqhash::value_hash;

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Strategy {
    /// Object equality through the default policy
    Default,
    /// Hash only the low 8 bits of each value, forcing long chains
    Clustered,
}

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'c', long = "initial_capacity", default_value_t = 16)]
    initial_capacity: usize,

    #[arg(short = 'l', long = "load_factor", default_value_t = 0.75)]
    load_factor: f32,

    #[arg(short = 'n', long = "count", default_value_t = 1000)]
    count: u64,

    #[arg(short = 's', long = "strategy", value_enum, default_value_t = Strategy::Default)]
    strategy: Strategy,
}

struct Clustered;

impl EqualityComparator<u64> for Clustered {
    fn hash_code(&self, value: &u64) -> i32 {
        value_hash(&(value & 0xFF))
    }

    fn equals(&self, a: &u64, b: &u64) -> bool {
        a == b
    }
}

fn fill<C: EqualityComparator<u64>>(set: &mut HashSet<u64, C>, count: u64) {
    let mut expansions = 0;
    let mut capacity = set.capacity();
    for value in 0..count {
        set.add(value);
        if set.capacity() != capacity {
            expansions += 1;
            capacity = set.capacity();
        }
    }

    println!("Inserted {} values ({} expansions)", set.len(), expansions);
    println!(
        "Final capacity: {} (threshold {})",
        set.capacity(),
        set.threshold()
    );

    set.chain_histogram().print();
    set.bucket_stats().print();
}

fn main() {
    let args = Args::parse();

    println!(
        "Creating HashSet with initial capacity {} and load factor {} ({:?} strategy)",
        args.initial_capacity, args.load_factor, args.strategy
    );

    match args.strategy {
        Strategy::Default => {
            let mut set = HashSet::with_capacity_and_load_factor(
                args.initial_capacity,
                args.load_factor,
            );
            fill(&mut set, args.count);
        }
        Strategy::Clustered => {
            let mut set = HashSet::with_capacity_load_factor_and_comparator(
                args.initial_capacity,
                args.load_factor,
                Clustered,
            );
            fill(&mut set, args.count);
        }
    }

    println!();
    println!("Filling a HashMap<String, u64> with the same count...");
    let map: HashMap<String, u64> = (0..args.count).map(|i| (format!("key_{i}"), i)).collect();
    map.bucket_stats().print();
}
