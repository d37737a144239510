use log::{debug, info, warn};
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::Path;

use crate::app_config::Config;
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::query;
use crate::subtitle_processor::{ParseOptions, SubtitleFile};

// @module: Application controller for subtitle queries

/// Where query times come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryMode {
    /// A single `mm:ss` passed on the command line
    Argument(String),
    /// One line read from a non-terminal stdin
    Piped,
    /// Prompt-and-read loop on a terminal
    Interactive,
}

impl QueryMode {
    // @selects: Mode from the CLI argument and the kind of stdin
    pub fn select(argument: Option<String>, stdin_is_terminal: bool) -> Self {
        match argument {
            Some(query) => QueryMode::Argument(query),
            None if stdin_is_terminal => QueryMode::Interactive,
            None => QueryMode::Piped,
        }
    }
}

/// Main application controller for subtitle lookups
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self, AppError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Load `input_path` and answer queries against the process stdin/stdout
    pub fn run(&self, input_path: &Path, query: Option<String>) -> Result<(), AppError> {
        if !input_path.exists() {
            return Err(AppError::File(format!(
                "subtitle file does not exist: {}",
                input_path.display()
            )));
        }
        if !FileManager::file_exists(input_path) {
            return Err(AppError::File(format!(
                "not a regular file: {}",
                input_path.display()
            )));
        }

        let options = ParseOptions {
            lenient: self.config.lenient,
        };
        let subtitles = FileManager::load_subtitles(input_path, options)?;

        let mode = QueryMode::select(query, io::stdin().is_terminal());
        debug!("Query mode: {:?}", mode);

        let stdin = io::stdin();
        let stdout = io::stdout();
        self.run_queries(&subtitles, mode, stdin.lock(), stdout.lock())
    }

    /// Answer queries from `mode`, reading lines from `input` and writing matches to `output`
    pub fn run_queries<R: BufRead, W: Write>(
        &self,
        subtitles: &SubtitleFile,
        mode: QueryMode,
        mut input: R,
        mut output: W,
    ) -> Result<(), AppError> {
        if subtitles.is_empty() {
            warn!("No entries found, exiting");
            return Ok(());
        }

        let offset_ms = subtitles.effective_offset(self.config.offset_ms);
        if let Some(directive) = subtitles.offset_directive {
            info!("Using offset {} ms from the subtitle file", directive);
        }

        match mode {
            QueryMode::Argument(text) => {
                let query_ms = query::parse_query(&text)?;
                self.answer(subtitles, query_ms, offset_ms, &mut output)?;
            }
            QueryMode::Piped => match read_query_line(&mut input)? {
                Some(line) => {
                    let query_ms = query::parse_query(&line)?;
                    self.answer(subtitles, query_ms, offset_ms, &mut output)?;
                }
                None => debug!("No query on stdin"),
            },
            QueryMode::Interactive => loop {
                write!(output, "{}", self.config.prompt)?;
                output.flush()?;

                let Some(line) = read_query_line(&mut input)? else {
                    break;
                };
                let query_ms = query::parse_query(&line)?;
                self.answer(subtitles, query_ms, offset_ms, &mut output)?;
            },
        }

        output.flush()?;
        Ok(())
    }

    fn answer<W: Write>(
        &self,
        subtitles: &SubtitleFile,
        query_ms: i64,
        offset_ms: i64,
        output: &mut W,
    ) -> Result<(), AppError> {
        let count = query::write_matches(
            output,
            &subtitles.entries,
            query_ms,
            offset_ms,
            self.config.tolerance_ms,
        )?;
        debug!("{} match(es) at {} ms (offset {} ms)", count, query_ms, offset_ms);
        Ok(())
    }
}

// `None` on end of input or an empty line
fn read_query_line<R: BufRead>(input: &mut R) -> Result<Option<String>, AppError> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }

    let line = line.trim_end_matches(['\r', '\n']);
    if line.is_empty() {
        Ok(None)
    } else {
        Ok(Some(line.to_string()))
    }
}
