use anyhow::Result;
use clap::Parser;
use log::{error, info, warn};
use sandftp::client::{parse_user_command, FtpClient};
use sandftp::core_cli::ClientCli;
use sandftp::core_log::logger::init_logger;
use sandftp::{FtpError, FtpResult};
use std::io::Write;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "commands: ls, cd <dir>, rm <name>, put <localfile>, get <remotename>, pwd, mkdir <dir>, help, q";

enum Step {
    Next,
    Quit,
}

fn basename(path: &str) -> Option<&str> {
    Path::new(path).file_name().and_then(|name| name.to_str())
}

async fn put_file(client: &mut FtpClient, local: &str) -> FtpResult<()> {
    let Some(remote) = basename(local) else {
        warn!("cannot derive a remote name from `{}'", local);
        return Ok(());
    };
    let mut file = match File::open(local).await {
        Ok(file) => file,
        Err(e) => {
            warn!("failed to open `{}': {}", local, e);
            return Ok(());
        }
    };
    let sent = client.put(remote, &mut file).await?;
    info!("stored {} ({} bytes)", remote, sent);
    Ok(())
}

async fn get_file(client: &mut FtpClient, remote: &str) -> FtpResult<()> {
    let Some(local) = basename(remote) else {
        warn!("cannot derive a local name from `{}'", remote);
        return Ok(());
    };
    let mut file = match File::create(local).await {
        Ok(file) => file,
        Err(e) => {
            warn!("failed to open `{}': {}", local, e);
            return Ok(());
        }
    };
    match client.get(remote, &mut file).await {
        Ok(received) => {
            info!("saved {} ({} bytes)", local, received);
            Ok(())
        }
        Err(e) => {
            drop(file);
            if let Err(rm) = tokio::fs::remove_file(local).await {
                warn!("failed to remove partial file `{}': {}", local, rm);
            }
            Err(e)
        }
    }
}

async fn run_command(client: &mut FtpClient, cmd: &str, arg: &str) -> FtpResult<Step> {
    match cmd {
        "" => {}
        "q" => return Ok(Step::Quit),
        "ls" => {
            let mut stdout = tokio::io::stdout();
            client.list(&mut stdout).await?;
        }
        "cd" => client.chdir(arg).await?,
        "rm" => client.remove(arg).await?,
        "put" => put_file(client, arg).await?,
        "get" => get_file(client, arg).await?,
        "pwd" => println!("{}", client.pwd().await?),
        "mkdir" => client.mkdir(arg).await?,
        "help" => println!("{}", HELP),
        other => warn!("unknown command `{}'; try help", other),
    }
    Ok(Step::Next)
}

fn prompt() {
    print!("sandftp> ");
    let _ = std::io::stdout().flush();
}

async fn interactive_console(client: &mut FtpClient) -> FtpResult<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt();
        let Some(line) = lines.next_line().await? else {
            println!();
            return Ok(());
        };
        let (cmd, arg) = parse_user_command(&line);
        match run_command(client, cmd, arg).await {
            Ok(Step::Next) => {}
            Ok(Step::Quit) => return Ok(()),
            Err(e) if e.aborts_command_only() => warn!("{}", e),
            Err(e) => return Err(e),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = ClientCli::parse();
    init_logger(args.verbose);

    let mut client = FtpClient::connect(&args.host, args.port).await?;
    match interactive_console(&mut client).await {
        Ok(()) => {
            client.quit().await?;
            Ok(())
        }
        Err(FtpError::ConnectionClosed) => {
            info!("server closed the connection");
            Ok(())
        }
        Err(e) => {
            error!("unexpected error: {}", e);
            Err(e.into())
        }
    }
}
