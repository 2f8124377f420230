//! kvseq CLI
//!
//! Inspect and edit string lists and queues kept in a durable store.

use clap::{Parser, Subcommand};
use kvseq::config::WalSyncStrategy;
use kvseq::{Config, Context, DurableStore, ListMapper, QueueMapper, Result, StoreKey};
use tracing_subscriber::{fmt, EnvFilter};

/// kvseq CLI
#[derive(Parser, Debug)]
#[command(name = "kvseq-cli")]
#[command(about = "Typed lists and queues over a durable key-value store")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = "./kvseq_data")]
    data_dir: String,

    /// Store region holding the list or queue
    #[arg(short, long, default_value = "default")]
    region: String,

    /// fsync the WAL after every write
    #[arg(long)]
    sync_every_write: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Operate on a list
    List {
        #[command(subcommand)]
        op: ListOp,
    },

    /// Operate on a queue
    Queue {
        #[command(subcommand)]
        op: QueueOp,
    },

    /// Rewrite the WAL down to the live keys
    Compact,
}

#[derive(Subcommand, Debug)]
enum ListOp {
    /// Print the list length
    Len,

    /// Print the element at an index
    Get { index: i64 },

    /// Overwrite the element at an index
    Set { index: i64, value: String },

    /// Append an element
    Push { value: String },

    /// Print every element with its index
    Dump,
}

#[derive(Subcommand, Debug)]
enum QueueOp {
    /// Print the number of queued elements
    Len,

    /// Enqueue an element
    Push { value: String },

    /// Print the front element
    Peek,

    /// Remove the front element
    Pop,

    /// Print and remove every element
    Drain,

    /// Print every element without removing it
    Pending,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,kvseq=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    tracing::debug!("kvseq CLI v{}", kvseq::VERSION);
    tracing::debug!("Data directory: {}", args.data_dir);

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let sync = if args.sync_every_write {
        WalSyncStrategy::EveryWrite
    } else {
        Config::default().wal_sync_strategy
    };
    let config = Config::builder()
        .data_dir(&args.data_dir)
        .wal_sync_strategy(sync)
        .build();

    let mut store = DurableStore::open(config)?;
    let key = StoreKey::new(args.region);

    match args.command {
        Commands::List { op } => {
            let mut ctx = Context::new(&mut store);
            run_list(&mut ctx, key, op)?;
        }
        Commands::Queue { op } => {
            let mut ctx = Context::new(&mut store);
            run_queue(&mut ctx, key, op)?;
        }
        Commands::Compact => store.compact()?,
    }

    store.close()
}

fn run_list(ctx: &mut Context<'_>, key: StoreKey, op: ListOp) -> Result<()> {
    let list = ListMapper::<String>::with_bincode(key)?;
    match op {
        ListOp::Len => println!("{}", list.len(ctx)?),
        ListOp::Get { index } => println!("{}", list.get(ctx, index)?),
        ListOp::Set { index, value } => list.set(ctx, index, &value)?,
        ListOp::Push { value } => list.push(ctx, &value)?,
        ListOp::Dump => list.iterate(ctx, |index, value| println!("{}\t{}", index, value))?,
    }
    Ok(())
}

fn run_queue(ctx: &mut Context<'_>, key: StoreKey, op: QueueOp) -> Result<()> {
    let queue = QueueMapper::<String>::with_bincode(key)?;
    match op {
        QueueOp::Len => println!("{}", queue.len(ctx)?),
        QueueOp::Push { value } => queue.push(ctx, &value)?,
        QueueOp::Peek => println!("{}", queue.peek(ctx)?),
        QueueOp::Pop => queue.pop(ctx)?,
        QueueOp::Drain => queue.drain(ctx, |value| println!("{}", value))?,
        QueueOp::Pending => {
            queue.for_each_pending(ctx, |position, value| println!("{}\t{}", position, value))?
        }
    }
    Ok(())
}
