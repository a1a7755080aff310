use clap::Parser;
use mini_dht::{setup_logging, Config, Node, PeerAddress, Response, Result};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser)]
#[command(name = "mini-dht")]
#[command(about = "A minimal peer-to-peer file lookup node")]
#[command(version)]
struct Cli {
    /// Host to bind and advertise
    #[arg(long, default_value = "127.0.0.1")]
    host: String,
    /// Port to listen on (0 picks a free port)
    #[arg(short, long, default_value = "8080")]
    port: u16,
    /// Known peer to connect to at startup (host:port, repeatable)
    #[arg(short = 'e', long = "peer")]
    peers: Vec<String>,
    /// Per-call network timeout in seconds
    #[arg(long, default_value = "5")]
    timeout: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();

    let cli = Cli::parse();
    let config = Config {
        host: cli.host,
        port: cli.port,
        bootstrap_peers: cli.peers,
        timeout_secs: cli.timeout,
    };

    let mut node = Node::bind(config).await?;
    node.connect_bootstrap_peers().await;

    println!("node {} ready on {}", node.id(), node.address());
    println!("commands: store <file> | find <file> | connect <host:port> | ping <host:port> | peers | keys | id | quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if !run_command(&node, line.trim()).await {
                    break;
                }
            }
        }
    }

    node.shutdown().await;
    Ok(())
}

/// Interpret one shell line against the node. Returns false on `quit`.
async fn run_command(node: &Node, line: &str) -> bool {
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    match command {
        "" => {}
        "store" if !rest.is_empty() => {
            let key = node.store_file(rest).await;
            println!("stored under {}", key);
        }
        "find" if !rest.is_empty() => match node.find_file(rest).await {
            Response::Found { peers } => {
                println!("held by:");
                for peer in peers {
                    println!("  {}", peer);
                }
            }
            _ => println!("not found"),
        },
        "connect" if !rest.is_empty() => match rest.parse::<PeerAddress>() {
            Ok(addr) => {
                if node.connect_to_peer(addr).await {
                    println!("connected");
                } else {
                    println!("unreachable");
                }
            }
            Err(e) => println!("{}", e),
        },
        "ping" if !rest.is_empty() => match rest.parse::<PeerAddress>() {
            Ok(addr) => println!("{}", if node.ping(&addr).await { "alive" } else { "no answer" }),
            Err(e) => println!("{}", e),
        },
        "peers" => {
            for peer in node.peers().await {
                println!("  {}", peer);
            }
        }
        "keys" => println!("{} keys stored locally", node.key_count().await),
        "id" => println!("{}", node.id()),
        "quit" | "exit" => return false,
        _ => println!("unknown command"),
    }
    true
}
