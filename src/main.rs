use std::env;

mod app;
mod audio;
mod config;
mod display;
mod library;
mod mpris;
mod runtime;
mod session;
mod timer;
mod ui;

#[cfg(test)]
mod testing;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    match env::args().nth(1).as_deref() {
        Some("--print-config") => {
            print!("{}", toml::to_string_pretty(&config::Settings::default())?);
            Ok(())
        }
        Some("--version" | "-V") => {
            println!("mindful {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Some(other) => Err(format!("unknown argument: {other}").into()),
        None => runtime::run(),
    }
}
