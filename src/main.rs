// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Drawbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Drawbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Drawbridge CLI entrypoint.
//!
//! Runs the full relay pipeline against a local editor model: one socket
//! owner connecting out to `ws://localhost:<port>`, one page relay, and the
//! built-in tool catalog wired onto the page bus. Stops on Ctrl-C.

use std::error::Error;
use std::path::Path;
use std::rc::Rc;

use tracing_subscriber::EnvFilter;

use drawbridge::bridge::{BridgeConfig, PageRelay, SocketOwner};
use drawbridge::bus::Bus;
use drawbridge::config::Config;
use drawbridge::model::Editor;
use drawbridge::tools::{attach_to_bus, catalog::built_in_tools};

const DEFAULT_CONFIG_FILE: &str = "drawbridge.json";
const DEFAULT_PAGE_URL: &str = "https://app.diagrams.net/";

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [<config-file>] [--port <port>] [--demo]\n  {program} [--config <file>] [--port <port>] [--demo]\n  {program} --url <ws-url> [--demo]\n\nIf config-file/--config is omitted, `{DEFAULT_CONFIG_FILE}` in the working directory is used;\na missing or unreadable config falls back to built-in defaults (port 3333).\n\n--port overrides the configured WebSocket port (1024..=65535).\n--url sets the full WebSocket endpoint and cannot be combined with --port.\n--demo starts with a small built-in diagram instead of an empty model."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    config: Option<String>,
    port: Option<u16>,
    url: Option<String>,
    demo: bool,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--demo" => {
                if options.demo {
                    return Err(());
                }
                options.demo = true;
            }
            "--config" => {
                if options.config.is_some() {
                    return Err(());
                }
                let path = args.next().ok_or(())?;
                options.config = Some(path);
            }
            "--port" => {
                if options.port.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                let port: u16 = raw.parse().map_err(|_| ())?;
                options.port = Some(port);
            }
            "--url" => {
                if options.url.is_some() {
                    return Err(());
                }
                let url = args.next().ok_or(())?;
                options.url = Some(url);
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.config.is_some() {
                    return Err(());
                }
                options.config = Some(arg);
            }
        }
    }

    if options.url.is_some() && options.port.is_some() {
        return Err(());
    }

    Ok(options)
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .init();

        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "drawbridge".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        let config_path = options
            .config
            .clone()
            .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_owned());
        let mut config = Config::load(Path::new(&config_path));
        if let Some(port) = options.port {
            // Unlike the config file, an explicit flag is not degraded.
            config.websocket_port = port;
            config.validate()?;
        }
        let url = options.url.clone().unwrap_or_else(|| config.ws_url());

        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
        let local = tokio::task::LocalSet::new();

        runtime.block_on(local.run_until(async move {
            let editor = Rc::new(if options.demo {
                drawbridge::model::fixtures::demo_editor()
            } else {
                Editor::new()
            });
            let registry = Rc::new(built_in_tools()?);
            let bus = Bus::new();
            let subscriptions = attach_to_bus(&bus, registry, editor);

            let bridge_config = BridgeConfig {
                url,
                url_patterns: config.url_patterns.clone(),
                ..BridgeConfig::default()
            };
            let (owner, control_tx) = SocketOwner::new(bridge_config);
            let relay = PageRelay::connect(1, DEFAULT_PAGE_URL, bus.clone(), control_tx);

            tokio::task::spawn_local(owner.run());
            tokio::task::spawn_local(relay.run());

            tokio::signal::ctrl_c().await?;
            tracing::info!("shutting down");
            for subscription in &subscriptions {
                subscription.dispose();
            }
            Ok::<(), Box<dyn Error>>(())
        }))?;

        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("drawbridge: {err}");
        std::process::exit(1);
    }
}
