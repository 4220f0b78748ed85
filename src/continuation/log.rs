use std::fs::File;
use std::fs::OpenOptions;
use std::io::Write;

use nalgebra::DVector;

#[cfg(feature = "additional_log_info")]
use chrono::prelude::*;

const SEPARATION_ITER: &str = "=========================\n\n";
const SEPARATION_LINE: &str = "+-------+--------------------------------+--------------------------------+\n";
const TITLE_LINE: &str = "| Step  |            State y            |          Residual g            |\n";
const FLOAT_WIDTH: usize = 30;
const INT_WIDTH: usize = 6;

/// Text-file log for the continuation run, gated the same way as the
/// teacher crate's own debugging log: plain content always, host/timestamp
/// banner only behind the `additional_log_info` feature.
pub struct ContinuationLog {
    path: String,
}

#[cfg(feature = "additional_log_info")]
fn write_time(content: &mut String) {
    let utc: DateTime<Utc> = Utc::now();
    let local: DateTime<Local> = Local::now();

    content.push_str("Simulation start:\n");
    content.push_str("  - UTC:   ");
    content.push_str(&utc.to_rfc2822());
    content.push('\n');
    content.push_str("  - Local: ");
    content.push_str(&local.to_rfc2822());
    content.push('\n');
}

#[cfg(feature = "additional_log_info")]
fn write_user_infos(content: &mut String) {
    content.push_str("OS: ");
    content.push_str(&whoami::distro());
    content.push('\n');
    content.push_str("Host: ");
    content.push_str(&whoami::devicename());
    content.push('\n');
    content.push_str("Username: ");
    content.push_str(&whoami::username());
    content.push('\n');
}

#[cfg(feature = "additional_log_info")]
fn write_rustc_info(content: &mut String) {
    content.push_str("Rust version: ");
    content.push_str(&rustc_version_runtime::version().to_string());
    content.push('\n');
}

impl ContinuationLog {
    pub fn new(path: &str) -> Self {
        let mut file = File::create(path).unwrap();

        let mut content = String::new();
        content.push_str("Runner informations\n");
        content.push_str("===================\n\n");

        #[cfg(feature = "additional_log_info")]
        {
            write_user_infos(&mut content);
            write_rustc_info(&mut content);
        }

        const VERSION: &str = env!("CARGO_PKG_VERSION");
        content.push_str("contique_rs version: ");
        content.push_str(VERSION);
        content.push('\n');

        #[cfg(feature = "additional_log_info")]
        write_time(&mut content);

        content.push('\n');

        write!(file, "{}", content).unwrap();

        ContinuationLog { path: path.to_string() }
    }

    pub fn add_content(&self, new_content: &str) {
        let mut file = OpenOptions::new().append(true).open(&self.path).unwrap();
        write!(file, "{}", new_content).unwrap();
    }

    pub fn add_parameters(&self, config: &str) {
        self.add_content(config);
    }

    pub fn add_step(&self, step: usize, y: &DVector<f64>, residual: &DVector<f64>, message: &str) {
        let mut header = String::new();
        header.push_str(SEPARATION_ITER);
        header.push_str(&format!("Step: {}\n", step));
        header.push_str(&format!("{}\n\n", message));
        self.add_content(&header);
        self.add_content(SEPARATION_LINE);
        self.add_content(TITLE_LINE);
        self.add_content(SEPARATION_LINE);

        let n = y.len().max(residual.len());
        for i in 0..n {
            let y_str = y.get(i).map(|v| v.to_string()).unwrap_or_default();
            let g_str = residual.get(i).map(|v| v.to_string()).unwrap_or_default();
            let mut entry = String::new();
            entry.push_str(&format!("| {:width$}", i, width = INT_WIDTH));
            entry.push_str(&format!("| {:width$}", y_str, width = FLOAT_WIDTH));
            entry.push_str(&format!("| {:width$} |\n", g_str, width = FLOAT_WIDTH));
            self.add_content(&entry);
        }
        self.add_content(SEPARATION_LINE);
        self.add_content("\n");
    }
}
