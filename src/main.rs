use cidr_flow::cmd::{execute, parse_command, Outcome};
use cidr_flow::config::{log_config_path, Config};
use cidr_flow::models::NetworkInput;
use cidr_flow::Session;
use colored::Colorize;
use std::error::Error;
use std::io::{self, BufRead, Write};

fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    dotenv::dotenv().ok();
    let log_config = log_config_path(|key| std::env::var(key).ok());
    log4rs::init_file(&log_config, Default::default()).expect("Error initializing log4rs");
    log::info!("#Start main()");
    let mut config = Config::from_env()?;

    if let Some(cidr) = std::env::args().nth(1) {
        config.network = NetworkInput::from_cidr_text(&cidr);
    }

    let mut session = Session::start(&config.network)
        .map_err(|e| format!("Invalid start network {:?}: {e}", config.network))?;

    if let Outcome::Continue(table) = execute(&mut session, parse_command("show")?, &config)? {
        println!("{table}");
    }

    let stdin = io::stdin();
    loop {
        print!("{} ", "cidr>".bold());
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let result = parse_command(&line).and_then(|command| execute(&mut session, command, &config));
        match result {
            Ok(Outcome::Continue(text)) => println!("{text}"),
            Ok(Outcome::Quit) => break,
            Err(e) => println!("{} {e}", "error:".red()),
        }
    }

    log::info!("#End main()");
    Ok(())
}
