// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Gruffles-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Gruffles and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Gruffles CLI entrypoint.
//!
//! By default this connects to the game server and runs the multi-pane TUI.
//!
//! Use `--render-map` to print a map file as braille text instead (no connection, no TUI).

use std::error::Error;
use std::path::PathBuf;

use gruffles::config::{ClientConfig, Overrides};
use gruffles::transport::Transport;
use tracing::info;

const DEFAULT_RENDER_CELLS: (usize, usize) = (40, 20);

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [<host:port>] [--layout <file.json>] [--log-file <path>]\n  {program} [--server <host:port>] [--layout <file.json>] [--log-file <path>]\n  {program} --render-map <file> [--cells <cols>x<rows>]\n\nThe server defaults to $GRUFFLES_SERVER, then {default}.\n--layout defaults to $GRUFFLES_LAYOUT, then the built-in layout.\n--log-file defaults to $GRUFFLES_LOG_FILE; without one nothing is logged.\n\n--render-map prints a map file as braille text ({cols}x{rows} cells unless --cells is given) and exits.\nIt takes no server, layout or log file.",
        default = gruffles::config::DEFAULT_SERVER,
        cols = DEFAULT_RENDER_CELLS.0,
        rows = DEFAULT_RENDER_CELLS.1,
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    server: Option<String>,
    layout: Option<String>,
    log_file: Option<String>,
    render_map: Option<String>,
    cells: Option<(usize, usize)>,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--server" => {
                if options.server.is_some() {
                    return Err(());
                }
                options.server = Some(args.next().ok_or(())?);
            }
            "--layout" => {
                if options.layout.is_some() {
                    return Err(());
                }
                options.layout = Some(args.next().ok_or(())?);
            }
            "--log-file" => {
                if options.log_file.is_some() {
                    return Err(());
                }
                options.log_file = Some(args.next().ok_or(())?);
            }
            "--render-map" => {
                if options.render_map.is_some() {
                    return Err(());
                }
                options.render_map = Some(args.next().ok_or(())?);
            }
            "--cells" => {
                if options.cells.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                options.cells = Some(parse_cells(&raw)?);
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.server.is_some() {
                    return Err(());
                }
                options.server = Some(arg);
            }
        }
    }

    if options.cells.is_some() && options.render_map.is_none() {
        return Err(());
    }

    // Offline rendering never connects, loads a layout or logs.
    let session_only =
        options.server.is_some() || options.layout.is_some() || options.log_file.is_some();
    if options.render_map.is_some() && session_only {
        return Err(());
    }

    Ok(options)
}

fn parse_cells(raw: &str) -> Result<(usize, usize), ()> {
    let (columns, rows) = raw.split_once('x').ok_or(())?;
    let columns: usize = columns.parse().map_err(|_| ())?;
    let rows: usize = rows.parse().map_err(|_| ())?;
    if columns == 0 || rows == 0 {
        return Err(());
    }
    Ok((columns, rows))
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "gruffles".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        if let Some(path) = options.render_map {
            let (columns, rows) = options.cells.unwrap_or(DEFAULT_RENDER_CELLS);
            let text = std::fs::read_to_string(&path)
                .map_err(|err| format!("cannot read map {path}: {err}"))?;
            println!("{}", gruffles::map::render_braille(&text, columns, rows)?);
            return Ok(());
        }

        let config = ClientConfig::from_env(Overrides {
            server: options.server,
            layout: options.layout.map(PathBuf::from),
            log_file: options.log_file.map(PathBuf::from),
        })?;
        gruffles::logging::init(config.log_file.as_deref())?;
        let layout = config.load_layout()?;
        info!(server = %config.server, layout = ?config.layout, "starting");

        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;

        runtime.block_on(async move {
            let transport =
                Transport::spawn(&tokio::runtime::Handle::current(), config.server.clone());

            let tui_join = tokio::task::spawn_blocking(move || {
                gruffles::tui::run(&config, &layout, transport).map_err(|err| err.to_string())
            })
            .await;

            let tui_result = tui_join.map_err(|err| -> Box<dyn Error> { Box::new(err) })?;
            tui_result.map_err(|err| {
                Box::new(std::io::Error::new(std::io::ErrorKind::Other, err)) as Box<dyn Error>
            })?;
            Ok::<(), Box<dyn Error>>(())
        })?;

        info!("stopped");
        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("gruffles: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_options, CliOptions};

    fn parse(args: &[&str]) -> Result<CliOptions, ()> {
        parse_options(args.iter().map(|arg| (*arg).to_owned()))
    }

    #[test]
    fn parses_empty_args() {
        assert_eq!(parse(&[]).expect("parse options"), CliOptions::default());
    }

    #[test]
    fn parses_positional_server() {
        let options = parse(&["mud.example:4000"]).expect("parse options");
        assert_eq!(options.server.as_deref(), Some("mud.example:4000"));
        assert!(options.render_map.is_none());
    }

    #[test]
    fn parses_server_layout_and_log_file() {
        let options = parse(&[
            "--server",
            "mud.example:4000",
            "--layout",
            "layout.json",
            "--log-file",
            "client.log",
        ])
        .expect("parse options");
        assert_eq!(options.server.as_deref(), Some("mud.example:4000"));
        assert_eq!(options.layout.as_deref(), Some("layout.json"));
        assert_eq!(options.log_file.as_deref(), Some("client.log"));
    }

    #[test]
    fn parses_render_map_with_cells() {
        let options =
            parse(&["--render-map", "map.txt", "--cells", "60x30"]).expect("parse options");
        assert_eq!(options.render_map.as_deref(), Some("map.txt"));
        assert_eq!(options.cells, Some((60, 30)));
    }

    #[test]
    fn rejects_render_map_with_a_log_file() {
        parse(&["--log-file", "x.log", "--render-map", "map.txt"]).unwrap_err();
        parse(&["--render-map", "map.txt", "--log-file", "x.log"]).unwrap_err();
    }

    #[test]
    fn accepts_large_cells_and_leaves_the_limit_to_the_raster() {
        let options =
            parse(&["--render-map", "map.txt", "--cells", "100000x100000"]).expect("parse options");
        assert_eq!(options.cells, Some((100_000, 100_000)));
    }

    #[test]
    fn rejects_malformed_cells() {
        for cells in ["60", "60x", "x30", "0x30", "60x0", "ax b"] {
            parse(&["--render-map", "map.txt", "--cells", cells]).unwrap_err();
        }
    }

    #[test]
    fn rejects_cells_without_render_map() {
        parse(&["--cells", "60x30"]).unwrap_err();
    }

    #[test]
    fn rejects_render_map_with_a_server_or_layout() {
        parse(&["--render-map", "map.txt", "mud.example:4000"]).unwrap_err();
        parse(&["--render-map", "map.txt", "--layout", "layout.json"]).unwrap_err();
    }

    #[test]
    fn rejects_unknown_args() {
        parse(&["--nope"]).unwrap_err();
    }

    #[test]
    fn rejects_duplicate_flags() {
        parse(&["--layout", "a.json", "--layout", "b.json"]).unwrap_err();
        parse(&["--log-file", "a", "--log-file", "b"]).unwrap_err();
        parse(&["--render-map", "a", "--render-map", "b"]).unwrap_err();
    }

    #[test]
    fn rejects_positional_server_with_server_flag() {
        parse(&["--server", "one:1", "two:2"]).unwrap_err();
        parse(&["one:1", "two:2"]).unwrap_err();
    }

    #[test]
    fn rejects_missing_values() {
        parse(&["--server"]).unwrap_err();
        parse(&["--render-map"]).unwrap_err();
    }
}
