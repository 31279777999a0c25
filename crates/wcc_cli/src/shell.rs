//! Interactive job builder.
//!
//! One task owns the session. It waits on typed commands and on a single
//! [`UiEvent`] channel carrying probe results and combine progress, so the
//! table updates as probes finish while the prompt stays responsive.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use wcc_core::errors::CombineResult;
use wcc_core::merge::{CombineReport, Combiner};
use wcc_core::models::ProbeStatus;
use wcc_core::probe::FfprobeProber;
use wcc_core::session::{Session, SessionEvent, UiEvent};
use wcc_core::view::{result_message, ProgressView, SessionView};

use crate::app::App;
use crate::commands::{parse_line, ShellCommand, HELP};
use crate::{paths, render};

const PROMPT: &str = "wcc> ";

enum Flow {
    Continue,
    Quit,
}

struct Shell<'a> {
    app: &'a mut App,
    session: Session<FfprobeProber>,
    combiner: Combiner,
    ui_events: mpsc::UnboundedSender<UiEvent>,
    combining: bool,
}

pub async fn run(app: &mut App, files: Vec<PathBuf>) -> Result<()> {
    let (ui_tx, mut ui_events) = mpsc::unbounded_channel::<UiEvent>();
    let session = Session::with_sender(Arc::new(app.prober()), ui_tx.clone());
    let combiner = app.combiner(false);

    let mut shell = Shell {
        app,
        session,
        combiner,
        ui_events: ui_tx,
        combining: false,
    };

    println!("WAV Channel Combiner {} (type 'help')", wcc_core::version());
    if !files.is_empty() {
        shell.session.add_files(files);
    }
    shell.print_table();
    prompt();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("read command")? else {
                    break;
                };
                if let Flow::Quit = shell.handle_line(&line) {
                    break;
                }
                prompt();
            }
            Some(event) = ui_events.recv() => {
                shell.handle_ui_event(event);
            }
        }
    }

    if shell.combining {
        println!("Abandoning the running combine job.");
    }
    Ok(())
}

fn prompt() {
    print!("{}", PROMPT);
    let _ = std::io::stdout().flush();
}

impl Shell<'_> {
    fn handle_line(&mut self, line: &str) -> Flow {
        let command = match parse_line(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Flow::Continue,
            Err(e) => {
                println!("{}", e);
                return Flow::Continue;
            }
        };

        if self.combining && command.mutates() {
            println!("A combine job is running; wait for it to finish.");
            return Flow::Continue;
        }

        match command {
            ShellCommand::Add(paths) => {
                self.session.add_files(paths);
                self.print_table();
            }
            ShellCommand::Drop(paths) => {
                let offered = paths.len();
                let added = self.session.add_dropped(paths).len();
                if added < offered {
                    println!("Ignored {} non-WAV file(s).", offered - added);
                }
                self.print_table();
            }
            ShellCommand::Move { index, direction } => {
                if self.session.reorder(index, direction) {
                    self.print_table();
                } else {
                    println!("Row {} cannot move {}.", index + 1, direction);
                }
            }
            ShellCommand::Remove(index) => match self.session.remove(index) {
                Some(file) => {
                    println!("Removed {}.", file.name);
                    self.print_table();
                }
                None => println!("No row {}.", index + 1),
            },
            ShellCommand::Output(path) => {
                let path = path.unwrap_or_else(|| self.app.default_output());
                if !paths::output_dir_exists(&path) {
                    println!("Warning: directory of {} does not exist", path.display());
                }
                self.app.remember_output(&path);
                println!("Output: {}", path.display());
                self.session.set_output_path(path);
            }
            ShellCommand::List => self.print_table(),
            ShellCommand::Combine => self.start_combine(),
            ShellCommand::Reset => {
                self.session.reset();
                println!("New job.");
            }
            ShellCommand::Help => println!("{}", HELP),
            ShellCommand::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    fn handle_session_event(&mut self, event: SessionEvent) {
        let SessionEvent::ProbeFinished { id, .. } = &event;
        let id = *id;
        if !self.session.handle_event(event) {
            return;
        }

        if let Some(file) = self.session.files().iter().find(|f| f.id == id) {
            match (&file.status, file.channels()) {
                (_, Some(channels)) => println!("\n{}: {} channel(s)", file.name, channels),
                (ProbeStatus::Failed(message), _) => println!("\n{}: {}", file.name, message),
                _ => {}
            }
        }
        if self.session.pending_count() == 0 {
            self.print_table();
        }
        prompt();
    }

    fn handle_ui_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::Session(event) => self.handle_session_event(event),
            UiEvent::Progress(event) => {
                print!("\r{}", render::progress(&ProgressView::from(&event)));
                let _ = std::io::stdout().flush();
            }
            UiEvent::CombineFinished(result) => {
                self.combining = false;
                self.print_result(&result);
                prompt();
            }
        }
    }

    fn start_combine(&mut self) {
        let request = match self.session.combine_request() {
            Ok(request) => request,
            Err(e) => {
                println!("{}", e);
                return;
            }
        };

        self.combining = true;
        let combiner = self.combiner.clone();
        let events = self.ui_events.clone();
        tokio::spawn(async move {
            let progress = events.clone();
            let result = combiner
                .combine(&request, move |event| {
                    let _ = progress.send(event.into());
                })
                .await;
            let _ = events.send(UiEvent::CombineFinished(result));
        });
    }

    fn print_result(&self, result: &CombineResult<CombineReport>) {
        println!();
        println!("{}", result_message(result));
        match result {
            Ok(_) => println!("Type 'reset' to start a new job."),
            Err(e) => {
                for line in e.diagnostics().map(render::diagnostic_tail).unwrap_or_default() {
                    println!("  {}", line);
                }
            }
        }
    }

    fn print_table(&self) {
        print!("{}", render::session(&SessionView::build(&self.session)));
    }
}
