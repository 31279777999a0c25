//! One-shot `probe` and `combine` subcommands.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use wcc_core::session::Session;
use wcc_core::view::{result_message, ProgressView, SessionView};

use crate::app::App;
use crate::cli::{CombineArgs, ProbeArgs};
use crate::{paths, render};

/// Exit code when the job is not ready to combine.
const EXIT_NOT_READY: u8 = 2;

pub async fn probe(app: &App, args: ProbeArgs) -> Result<ExitCode> {
    let (mut session, mut events) = Session::new(app.prober());
    session.add_files(args.files);
    session.settle(&mut events).await;

    print!("{}", render::session(&SessionView::build(&session)));

    let failed = session.files().iter().any(|f| f.probe_error().is_some());
    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

pub async fn combine(app: &mut App, args: CombineArgs) -> Result<ExitCode> {
    let output: PathBuf = args.output.unwrap_or_else(|| app.default_output());
    if !paths::output_dir_exists(&output) {
        eprintln!("Warning: directory of {} does not exist", output.display());
    }

    let (mut session, mut events) = Session::new(app.prober());
    session.add_files(args.files);
    session.set_output_path(&output);
    session.settle(&mut events).await;

    let view = SessionView::build(&session);
    let request = match session.combine_request() {
        Ok(request) => request,
        Err(e) => {
            print!("{}", render::session(&view));
            eprintln!("{}", e);
            return Ok(ExitCode::from(EXIT_NOT_READY));
        }
    };
    for warning in &view.warnings {
        eprintln!("Warning: {}", warning);
    }
    app.remember_output(&output);

    let combiner = app.combiner(args.overwrite);
    let result = combiner
        .combine(&request, |event| {
            let mut stderr = std::io::stderr().lock();
            let _ = write!(stderr, "\r{}", render::progress(&ProgressView::from(&event)));
            let _ = stderr.flush();
        })
        .await;
    eprintln!();

    println!("{}", result_message(&result));
    match result {
        Ok(report) => {
            if let Some(log) = report.log_path {
                tracing::info!("Job log: {}", log.display());
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            if let Some(diagnostics) = e.diagnostics() {
                for line in render::diagnostic_tail(diagnostics) {
                    eprintln!("  {}", line);
                }
            }
            Ok(ExitCode::FAILURE)
        }
    }
}
