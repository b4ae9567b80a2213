//! Single-pass rewrite of log4j call sites into slf4j form.

use crate::error::{ConvertError, line_of};
use serde::Serialize;

pub mod args;
pub mod recognize;
pub mod scanner;

use args::{Arguments, convert_arguments};
use recognize::{LogCall, looking_at_get_logger, looking_at_log_call, looking_at_log4j_import};
use scanner::{Cursor, is_word_char};

/// What the converter looks for and what it writes instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Logger variable names, matched case-insensitively.
    pub logger_names: Vec<String>,
    /// Level method names, matched case-insensitively.
    pub levels: Vec<String>,
    /// Classes imported in place of the first log4j import.
    pub target_imports: Vec<String>,
    /// Replacement for `Logger.getLogger`.
    pub factory_call: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            logger_names: vec!["logger".into(), "log".into()],
            levels: ["trace", "debug", "info", "error", "warn", "fatal"]
                .into_iter()
                .map(String::from)
                .collect(),
            target_imports: vec!["org.slf4j.Logger".into(), "org.slf4j.LoggerFactory".into()],
            factory_call: "LoggerFactory.getLogger".into(),
        }
    }
}

impl ConvertOptions {
    pub fn is_logger_name(&self, token: &str) -> bool {
        !token.is_empty() && self.logger_names.iter().any(|n| n.eq_ignore_ascii_case(token))
    }

    pub fn is_level(&self, token: &str) -> bool {
        !token.is_empty() && self.levels.iter().any(|l| l.eq_ignore_ascii_case(token))
    }

    fn import_block(&self) -> String {
        self.target_imports
            .iter()
            .map(|class| format!("import {};", class))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Counters for one conversion run.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionStats {
    pub log_calls: usize,
    pub converted_calls: usize,
    pub imports_replaced: usize,
    pub factory_calls: usize,
}

/// A log call left untouched because it could not be rewritten safely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    pub line: usize,
    pub arguments: String,
    pub message: String,
}

/// Result of converting one buffer.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub output: String,
    pub stats: ConversionStats,
    pub warnings: Vec<Warning>,
}

/// Convert a whole buffer. All state lives for this call only.
pub fn convert_source(source: &str, options: &ConvertOptions) -> Result<Conversion, ConvertError> {
    ConversionContext::new(source, options).run()
}

/// Per-buffer conversion state.
struct ConversionContext<'a> {
    cursor: Cursor<'a>,
    options: &'a ConvertOptions,
    output: String,
    imports_emitted: bool,
    stats: ConversionStats,
    warnings: Vec<Warning>,
}

impl<'a> ConversionContext<'a> {
    fn new(source: &'a str, options: &'a ConvertOptions) -> Self {
        Self {
            cursor: Cursor::new(source),
            options,
            output: String::with_capacity(source.len()),
            imports_emitted: false,
            stats: ConversionStats::default(),
            warnings: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Conversion, ConvertError> {
        let source = self.cursor.source();
        let mut index = 0;
        while index < source.len() {
            self.cursor.set_position(index);
            if at_word_boundary(source, index) {
                if let Some(call) = looking_at_log_call(&mut self.cursor, self.options) {
                    self.rewrite_log_call(index, call)?;
                    index = self.cursor.position();
                    continue;
                }
                if looking_at_log4j_import(&mut self.cursor) {
                    self.emit_imports_once();
                    index = self.cursor.position();
                    continue;
                }
                if looking_at_get_logger(&mut self.cursor) {
                    self.output.push_str(&self.options.factory_call);
                    self.stats.factory_calls += 1;
                    index = self.cursor.position();
                    continue;
                }
            }
            let Some(c) = source[index..].chars().next() else {
                break;
            };
            self.output.push(c);
            index += c.len_utf8();
        }

        Ok(Conversion {
            output: self.output,
            stats: self.stats,
            warnings: self.warnings,
        })
    }

    /// Emit the call head and its converted arguments. The cursor is left
    /// after the consumed text.
    fn rewrite_log_call(&mut self, start: usize, call: LogCall<'a>) -> Result<(), ConvertError> {
        let source = self.cursor.source();
        let head_end = self.cursor.position();
        self.stats.log_calls += 1;

        self.cursor.skip_whitespace();
        let open = self.cursor.position();
        let Some(close) = self.cursor.match_outer_parens()? else {
            self.warn(
                start,
                source[open..].lines().next().unwrap_or_default(),
                "unclosed argument list; left as is",
            );
            self.output.push_str(&source[start..head_end]);
            self.cursor.set_position(head_end);
            return Ok(());
        };

        let arguments = convert_arguments(&source[open + 1..close - 1]);
        match &arguments {
            Arguments::Converted(text) => {
                tracing::debug!(args = %text, "converted arguments");
                self.stats.converted_calls += 1;
            }
            Arguments::Unconvertible { text, operand } => {
                let message = format!(
                    "cannot convert operand [{}] to slf4j format; convert manually",
                    operand
                );
                self.warn(start, text, &message);
            }
            Arguments::Unchanged(_) => {}
        }

        self.output.push_str(call.identifier);
        self.output.push('.');
        self.output.push_str(call.level);
        self.output.push_str(arguments.text());
        Ok(())
    }

    fn emit_imports_once(&mut self) {
        if self.imports_emitted {
            tracing::debug!("dropping repeated log4j import");
            return;
        }
        self.imports_emitted = true;
        self.stats.imports_replaced += 1;
        let block = self.options.import_block();
        self.output.push_str(&block);
    }

    fn warn(&mut self, offset: usize, arguments: &str, message: &str) {
        let line = line_of(self.cursor.source(), offset);
        tracing::warn!(line, arguments, "{}", message);
        self.warnings.push(Warning {
            line,
            arguments: arguments.to_string(),
            message: message.to_string(),
        });
    }
}

fn at_word_boundary(source: &str, index: usize) -> bool {
    !matches!(source[..index].chars().next_back(), Some(c) if is_word_char(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert(source: &str) -> Conversion {
        convert_source(source, &ConvertOptions::default()).unwrap()
    }

    #[test]
    fn converts_concatenated_call() {
        let out = convert("logger.info(\"Value is \" + x + \" and \" + y);");
        assert_eq!(out.output, "logger.info(\"Value is {} and {}\", x, y);");
        assert_eq!(out.stats.log_calls, 1);
        assert_eq!(out.stats.converted_calls, 1);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn placeholder_call_is_unchanged() {
        let source = "logger.debug(\"already placeholder {}\", x);";
        let out = convert(source);
        assert_eq!(out.output, source);
        assert_eq!(out.stats.converted_calls, 0);
    }

    #[test]
    fn whitespace_is_normalized() {
        let out = convert("logger   .    info   (  \"x\"  )");
        assert_eq!(out.output, "logger.info(\"x\")");
    }

    #[test]
    fn casing_is_preserved() {
        for (source, expected) in [
            ("LOGGER.INFO(\"a \" + b)", "LOGGER.INFO(\"a {}\", b)"),
            ("Logger.Info(\"a \" + b)", "Logger.Info(\"a {}\", b)"),
            ("logger.info(\"a \" + b)", "logger.info(\"a {}\", b)"),
        ] {
            assert_eq!(convert(source).output, expected);
        }
    }

    #[test]
    fn unbalanced_call_is_kept_with_warning() {
        let source = "log.warn(\"Hello \" + greetWho(\"wo\" + \"r\"));\nnext();";
        let out = convert(source);
        assert_eq!(out.output, source);
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.warnings[0].line, 1);
        assert!(out.warnings[0].message.contains("greetWho(\"wo\""));
    }

    #[test]
    fn plus_char_literal_call_is_kept() {
        let source = "log.info(\"a\" + '+' + b);";
        let out = convert(source);
        assert_eq!(out.output, source);
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn imports_are_emitted_once() {
        let source = "import org.apache.log4j.Logger;\nimport org.apache.log4j.Level;\nimport java.util.List;\n";
        let out = convert(source);
        assert_eq!(
            out.output,
            "import org.slf4j.Logger;\nimport org.slf4j.LoggerFactory;\n\nimport java.util.List;\n"
        );
        assert_eq!(out.stats.imports_replaced, 1);
    }

    #[test]
    fn factory_call_is_replaced() {
        let out = convert("private static final Logger logger = Logger.getLogger(Foo.class);");
        assert_eq!(
            out.output,
            "private static final Logger logger = LoggerFactory.getLogger(Foo.class);"
        );
        assert_eq!(out.stats.factory_calls, 1);
    }

    #[test]
    fn identifiers_inside_words_are_ignored() {
        let source = "catalog.info(\"a \" + b); MyLogger.getLogger(x); reimport org.apache.log4j.X;";
        assert_eq!(convert(source).output, source);
    }

    #[test]
    fn member_access_logger_is_converted() {
        assert_eq!(
            convert("this.log.error(\"bad \" + x)").output,
            "this.log.error(\"bad {}\", x)"
        );
    }

    #[test]
    fn unclosed_call_passes_through() {
        let source = "// logger.info(\"start \" + x\n";
        let out = convert(source);
        assert_eq!(out.output, source);
        assert_eq!(out.stats.log_calls, 1);
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn non_call_mentions_are_untouched() {
        let source = "// see log.info for details\nint x = logger.trace;";
        assert_eq!(convert(source).output, source);
    }

    #[test]
    fn non_ascii_text_survives() {
        let source = "// größe ✓\nlog.info(\"naïve \" + wert);";
        assert_eq!(
            convert(source).output,
            "// größe ✓\nlog.info(\"naïve {}\", wert);"
        );
    }

    #[test]
    fn conversion_is_idempotent() {
        let source = "import org.apache.log4j.Logger;\n\
            class A {\n\
            \x20   static Logger log = Logger.getLogger(A.class);\n\
            \x20   void f() { log.info(\"a \" + b + \" c\"); log.debug(\"x\"); }\n\
            }\n";
        let once = convert(source).output;
        let twice = convert(&once).output;
        assert_eq!(once, twice);
        assert!(once.contains("log.info(\"a {} c\", b)"));
        assert!(once.contains("LoggerFactory.getLogger(A.class)"));
    }

    #[test]
    fn empty_input() {
        let out = convert("");
        assert_eq!(out.output, "");
        assert_eq!(out.stats, ConversionStats::default());
    }

    #[test]
    fn custom_target_imports() {
        let options = ConvertOptions {
            target_imports: vec!["org.slf4j.Logger".into()],
            ..ConvertOptions::default()
        };
        let out = convert_source("import org.apache.log4j.*;", &options).unwrap();
        assert_eq!(out.output, "import org.slf4j.Logger;");
    }
}
