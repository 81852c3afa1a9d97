use chain_hash::Dictionary;
use chain_hash::HashFn;
use clap::Parser;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'c', long = "target_capacity", default_value_t = 1000)]
    target_capacity: usize,

    /// Number of keys to insert; defaults to the target capacity.
    #[arg(short = 'n', long = "num_values")]
    num_values: Option<usize>,

    /// Hash keys with a stride-64 function, which leaves the low six bits
    /// zero and crowds every key into a few slots.
    #[arg(long = "poor_hash")]
    poor_hash: bool,
}

fn fill<S>(dict: &mut Dictionary<u64, u64, S>, num_values: usize)
where
    S: chain_hash::HashFunction<u64>,
{
    let mut last_capacity = dict.capacity();
    for i in 0..num_values as u64 {
        if let Err(err) = dict.insert(i, i * 2) {
            panic!("failed to insert {i}: {err}");
        }
        if dict.capacity() != last_capacity {
            println!(
                "  grew {} -> {} slots after {} inserts",
                last_capacity,
                dict.capacity(),
                dict.len()
            );
            last_capacity = dict.capacity();
        }
    }
}

fn report<S>(dict: &Dictionary<u64, u64, S>) {
    println!("Inserted {} values into dictionary", dict.len());
    println!("Final load factor: {:.2}%", dict.load_factor() * 100.0);
    println!(
        "Collision count: {}, longest chain: {}",
        dict.collision_count(),
        dict.max_chain_length()
    );
    dict.debug_stats().print();
}

fn main() {
    let args = Args::parse();
    let num_values = args.num_values.unwrap_or(args.target_capacity);

    println!(
        "Creating Dictionary with target capacity: {}",
        args.target_capacity
    );

    if args.poor_hash {
        let mut dict: Dictionary<u64, u64, _> = Dictionary::with_capacity_and_hasher(
            args.target_capacity,
            HashFn(|key: &u64| key.wrapping_mul(64)),
        );
        println!("Actual capacity: {}", dict.capacity());
        println!("Filling dictionary with a stride-64 hash...");
        fill(&mut dict, num_values);
        report(&dict);
    } else {
        let mut dict: Dictionary<u64, u64> = Dictionary::with_capacity(args.target_capacity);
        println!("Actual capacity: {}", dict.capacity());
        println!("Filling dictionary with the default hash...");
        fill(&mut dict, num_values);
        report(&dict);
    }
}
