use clap::Parser;
use std::path::PathBuf;

/// Qase report viewer: serves or exports a pre-generated Qase JSONP test report.
#[derive(Parser, Debug, Clone)]
#[command(name = "qase-report-viewer")]
pub struct CliArgs {
    /// Directory containing the `qase-report-jsonp/` data set
    #[arg(short = 'r', long = "report-dir", env = "QASE_REPORT_DIR", default_value = ".")]
    pub report_dir: PathBuf,

    /// Remote base URL hosting `qase-report-jsonp/` (overrides --report-dir)
    #[arg(short = 'u', long = "report-url")]
    pub report_url: Option<String>,

    /// HTTP port for the viewer
    #[arg(long = "port", default_value_t = DEFAULT_VIEWER_PORT)]
    pub port: u16,

    /// Address to bind the viewer to
    #[arg(long = "bind", default_value = DEFAULT_BIND_ADDR)]
    pub bind: String,

    /// Write a static HTML bundle into this directory and exit
    #[arg(short = 'e', long = "export")]
    pub export_dir: Option<PathBuf>,

    /// Also write logs to this file
    #[arg(short = 'l', long = "log-file")]
    pub log_file: Option<PathBuf>,
}

/// Where the report data is read from.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportLocation {
    Dir(PathBuf),
    Url(String),
}

#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub location: ReportLocation,
    pub port: u16,
    pub bind: String,
    pub export_dir: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

// Network constants
pub const DEFAULT_VIEWER_PORT: u16 = 9880;
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1";
pub const REMOTE_FETCH_TIMEOUT_SECS: u64 = 30;

// Resource layout produced by the Qase reporter
pub const REPORT_ROOT: &str = "qase-report-jsonp";
pub const REPORT_FILE: &str = "report.jsonp";
pub const RESULTS_DIR: &str = "results";
pub const ATTACHMENTS_DIR: &str = "attachments";

// Broadcast capacity for state change notifications
pub const CHANGE_CHANNEL_SIZE: usize = 64;

/// Relative path of the preview collection.
pub fn report_path() -> String {
    format!("{}/{}", REPORT_ROOT, REPORT_FILE)
}

/// Relative path of one test's detail record.
pub fn result_path(test_id: &str) -> String {
    format!("{}/{}/{}.jsonp", REPORT_ROOT, RESULTS_DIR, test_id)
}

/// Relative path (and link target) of an attachment.
pub fn attachment_path(attachment_id: &str, file_name: &str) -> String {
    format!(
        "{}/{}/{}",
        REPORT_ROOT,
        ATTACHMENTS_DIR,
        attachment_file_name(attachment_id, file_name)
    )
}

/// File name an attachment is stored under inside the attachments directory.
pub fn attachment_file_name(attachment_id: &str, file_name: &str) -> String {
    format!("{}-{}", attachment_id, file_name)
}

impl ViewerConfig {
    pub fn from_args(args: CliArgs) -> Self {
        let location = match args.report_url {
            Some(url) => ReportLocation::Url(url),
            None => ReportLocation::Dir(args.report_dir),
        };

        ViewerConfig {
            location,
            port: args.port,
            bind: args.bind,
            export_dir: args.export_dir,
            log_file: args.log_file,
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }

    /// Local data directory, if the report is read from disk.
    pub fn report_dir(&self) -> Option<&PathBuf> {
        match &self.location {
            ReportLocation::Dir(dir) => Some(dir),
            ReportLocation::Url(_) => None,
        }
    }
}
