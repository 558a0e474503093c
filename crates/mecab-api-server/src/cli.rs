use std::path::PathBuf;

use clap::Parser;
use mecab_api_config::Config;
use mecab_api_config::log::LogFormat;

/// Command line flags. Every flag overrides the matching environment variable.
#[derive(Parser, Debug, Default)]
#[command(name = "mecab-api", about = "Morphological analysis over HTTP", version)]
pub struct Args {
    /// Host bound when no socket is handed down
    #[arg(long)]
    pub host: Option<String>,

    /// Port bound when no socket is handed down
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Dictionary root directory (defaults to `mecab-config --dicdir`)
    #[arg(long)]
    pub dicdir: Option<PathBuf>,

    /// Generic dictionary, defaults to `<dicdir>/ipadic`
    #[arg(long)]
    pub ipadic: Option<PathBuf>,

    /// UniDic dictionary, defaults to `<dicdir>/unidic`
    #[arg(long)]
    pub unidic: Option<PathBuf>,

    /// NEologd configuration file
    #[arg(long)]
    pub neologd_config: Option<PathBuf>,

    /// Seconds to wait for in-flight requests on shutdown
    #[arg(long)]
    pub shutdown_grace_secs: Option<u64>,

    /// Log output: text or json
    #[arg(long, value_parser = parse_log_format)]
    pub log_format: Option<LogFormat>,
}

fn parse_log_format(value: &str) -> Result<LogFormat, String> {
    match value {
        "text" => Ok(LogFormat::Text),
        "json" => Ok(LogFormat::Json),
        other => Err(format!("unknown log format {other:?}, expected text or json")),
    }
}

impl Args {
    pub fn apply(self, config: &mut Config) {
        if let Some(host) = self.host {
            config.network.host = host;
        }
        if let Some(port) = self.port {
            config.network.fallback_port = port;
        }
        if let Some(dicdir) = self.dicdir {
            config.dictionary.dicdir = Some(dicdir);
        }
        if let Some(ipadic) = self.ipadic {
            config.dictionary.ipadic = Some(ipadic);
        }
        if let Some(unidic) = self.unidic {
            config.dictionary.unidic = Some(unidic);
        }
        if let Some(path) = self.neologd_config {
            config.dictionary.neologd_config = path;
        }
        if let Some(secs) = self.shutdown_grace_secs {
            config.shutdown.grace_secs = secs;
        }
        if let Some(format) = self.log_format {
            config.log.format = format;
        }
    }
}
