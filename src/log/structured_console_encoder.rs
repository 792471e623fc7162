use log::{
    Record,
    kv::{Error, Key, Value, VisitSource},
};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::encode::{Color, Encode, Style, Write};
use serde::Deserialize;
use std::io;

#[derive(Debug, Deserialize)]
pub struct StructuredConsoleEncoderConfig {
    pub pattern: Option<String>,
    /// Colour used for keys; `none` disables styling.
    pub key_color: Option<String>,
}

/// Pattern encoder that appends the record's key-values as ` key=value`.
///
/// Values containing whitespace, `=` or quotes are quoted so the output stays
/// splittable on spaces.
#[derive(Debug)]
pub struct StructuredConsoleEncoder {
    delegate: PatternEncoder,
    key_color: Option<Color>,
}

impl StructuredConsoleEncoder {
    pub fn new(pattern: &str) -> Self {
        Self {
            delegate: PatternEncoder::new(pattern),
            key_color: Some(Color::Cyan),
        }
    }

    pub fn with_key_color(mut self, key_color: Option<Color>) -> Self {
        self.key_color = key_color;
        self
    }
}

impl Encode for StructuredConsoleEncoder {
    fn encode(&self, w: &mut dyn Write, record: &Record) -> anyhow::Result<()> {
        self.delegate.encode(w, record)?;

        let mut visitor = KeyValueVisitor {
            writer: w,
            key_color: self.key_color,
            io_err: None,
        };

        if let Err(kv_err) = record.key_values().visit(&mut visitor) {
            if let Some(io_err) = visitor.io_err {
                return Err(io_err.into());
            }
            write!(w, " [KV Error: {}]", kv_err)?;
        }

        w.write_all(b"\n")?;
        Ok(())
    }
}

struct KeyValueVisitor<'a> {
    writer: &'a mut dyn Write,
    key_color: Option<Color>,
    io_err: Option<io::Error>,
}

impl<'kvs> VisitSource<'kvs> for KeyValueVisitor<'_> {
    fn visit_pair(&mut self, key: Key<'kvs>, value: Value<'kvs>) -> Result<(), Error> {
        let result = (|| {
            if let Some(color) = self.key_color {
                self.writer.set_style(Style::new().text(color))?;
            }
            write!(self.writer, " {}=", key)?;
            if self.key_color.is_some() {
                self.writer.set_style(&Style::default())?;
            }
            write!(self.writer, "{}", quote_if_needed(&value.to_string()))?;
            Ok::<(), io::Error>(())
        })();

        if let Err(e) = result {
            self.io_err = Some(e);
            return Err(Error::msg("io error during visit"));
        }

        Ok(())
    }
}

fn quote_if_needed(value: &str) -> String {
    if value.is_empty() || value.chars().any(|c| c.is_whitespace() || c == '=' || c == '"') {
        format!("{:?}", value)
    } else {
        value.to_string()
    }
}

fn parse_color(name: &str) -> Option<Color> {
    match name.to_lowercase().as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "white" => Some(Color::White),
        _ => None,
    }
}

pub struct StructuredConsoleEncoderDeserializer;

impl log4rs::config::Deserialize for StructuredConsoleEncoderDeserializer {
    type Trait = dyn Encode;
    type Config = StructuredConsoleEncoderConfig;

    fn deserialize(
        &self,
        config: StructuredConsoleEncoderConfig,
        _: &log4rs::config::Deserializers,
    ) -> anyhow::Result<Box<dyn Encode>> {
        let pattern = config.pattern.as_deref().unwrap_or("{d} {l} {m}");
        let mut encoder = StructuredConsoleEncoder::new(pattern);
        if let Some(name) = config.key_color {
            encoder = encoder.with_key_color(parse_color(&name));
        }
        Ok(Box::new(encoder))
    }
}
