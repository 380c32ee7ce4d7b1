use std::collections::BTreeMap;

use chrono::Utc;
use serde_json::{Map, Value};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_error::ErrorLayer;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::Context;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

const DEFAULT_FILTER: &str = "quest_points=info,quest_points_ethereum_ledger_client=info";

/// Fields recorded on a span, kept in its extensions so formatters can print them.
#[derive(Debug, Clone, Default)]
pub struct SpanFields {
    pub fields: BTreeMap<String, String>,
}

impl SpanFields {
    fn display(&self) -> String {
        self.fields.iter().map(|(k, v)| format!("{}={}", k, v)).collect::<Vec<_>>().join(", ")
    }
}

struct SpanFieldCollector<'a>(&'a mut SpanFields);

impl Visit for SpanFieldCollector<'_> {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let formatted = format!("{:?}", value).trim_matches('"').to_string();
        self.0.fields.insert(field.name().to_string(), formatted);
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.fields.insert(field.name().to_string(), value.to_string());
    }
}

/// Copies span fields into the span's extensions on creation and on `record`.
pub struct FieldCollectorLayer;

impl<S> Layer<S> for FieldCollectorLayer
where
    S: Subscriber + for<'lookup> LookupSpan<'lookup>,
{
    fn on_new_span(&self, attrs: &tracing::span::Attributes<'_>, id: &tracing::span::Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else { return };
        let mut fields = SpanFields::default();
        attrs.record(&mut SpanFieldCollector(&mut fields));
        span.extensions_mut().insert(fields);
    }

    fn on_record(&self, id: &tracing::span::Id, values: &tracing::span::Record<'_>, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else { return };
        let mut extensions = span.extensions_mut();
        let mut fields = extensions.remove::<SpanFields>().unwrap_or_default();
        values.record(&mut SpanFieldCollector(&mut fields));
        extensions.insert(fields);
    }
}

/// Walks from the root span to the current one, collecting every span's fields.
fn collect_scope_fields<S, N>(ctx: &FmtContext<'_, S, N>) -> (Option<String>, BTreeMap<String, String>)
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    let mut merged = BTreeMap::new();
    let mut name = None;
    if let Some(scope) = ctx.event_scope() {
        for span in scope.from_root() {
            name = Some(span.metadata().name().to_string());
            if let Some(fields) = span.extensions().get::<SpanFields>() {
                merged.extend(fields.fields.clone());
            }
        }
    }
    (name, merged)
}

// Pretty formatter is formatted for console readability
pub struct PrettyFormatter;

impl<S, N> FormatEvent<S, N> for PrettyFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(&self, ctx: &FmtContext<'_, S, N>, mut writer: Writer<'_>, event: &Event<'_>) -> std::fmt::Result {
        let meta = event.metadata();
        let now = Utc::now().format("%y-%m-%d %H:%M:%S").to_string();

        let ts_color = "\x1b[96m";
        let level_color = match *meta.level() {
            Level::TRACE => "\x1b[90m",
            Level::DEBUG => "\x1b[34m",
            Level::INFO => "\x1b[32m",
            Level::WARN => "\x1b[33m",
            Level::ERROR => "\x1b[31m",
        };
        let msg_color = "\x1b[97m";
        let component_color = "\x1b[92m";
        let field_color = "\x1b[90m";
        let reset = "\x1b[0m";

        let mut visitor = FieldExtractor::default();
        event.record(&mut visitor);

        // Timestamp | Level | Component | Message (event fields, span fields)
        write!(writer, "{}{}{} ", ts_color, now, reset)?;
        write!(writer, "{}|{} ", field_color, reset)?;
        write!(writer, "{}{:<5}{} ", level_color, *meta.level(), reset)?;
        write!(writer, "{}|{} ", field_color, reset)?;
        write!(writer, "{}{:<8}{} ", component_color, component_name(meta.target()), reset)?;
        write!(writer, "{}|{} ", field_color, reset)?;
        write!(writer, "{}{}{}", msg_color, visitor.message, reset)?;

        let (_, span_fields) = collect_scope_fields(ctx);
        let span_display = SpanFields { fields: span_fields }.display();
        if !visitor.fields.is_empty() || !span_display.is_empty() {
            let joined = [visitor.fields.as_str(), span_display.as_str()]
                .into_iter()
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(", ");
            write!(writer, " {}({}){}", field_color, joined, reset)?;
        }

        writeln!(writer)
    }
}

#[derive(Default)]
struct FieldExtractor {
    message: String,
    fields: String,
}

impl Visit for FieldExtractor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let formatted = format!("{:?}", value).trim_matches('"').to_string();
        if field.name() == "message" {
            self.message = formatted;
        } else {
            if !self.fields.is_empty() {
                self.fields.push_str(", ");
            }
            self.fields.push_str(&format!("{}={}", field.name(), formatted));
        }
    }
}

// JSON formatter, one object per line
pub struct JsonEventFormatter;

#[derive(Default)]
struct JsonFieldVisitor {
    message: Option<String>,
    fields: Map<String, Value>,
}

impl Visit for JsonFieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let v = format!("{:?}", value).trim_matches('"').to_string();
        if field.name() == "message" {
            self.message = Some(v);
        } else {
            self.fields.insert(field.name().to_string(), Value::String(v));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.fields.insert(field.name().to_string(), Value::String(value.to_string()));
        }
    }
}

impl<S, N> FormatEvent<S, N> for JsonEventFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(&self, ctx: &FmtContext<'_, S, N>, mut writer: Writer<'_>, event: &Event<'_>) -> std::fmt::Result {
        let meta = event.metadata();
        let mut visitor = JsonFieldVisitor::default();
        event.record(&mut visitor);

        let mut root = Map::new();
        root.insert(
            "timestamp".to_string(),
            Value::String(Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)),
        );
        root.insert("level".to_string(), Value::String(meta.level().to_string()));
        root.insert("target".to_string(), Value::String(meta.target().to_string()));
        root.insert("component".to_string(), Value::String(component_name(meta.target()).to_string()));
        if let Some(file) = meta.file() {
            root.insert("filename".to_string(), Value::String(file.to_string()));
        }
        if let Some(line) = meta.line() {
            root.insert("line_number".to_string(), Value::from(line));
        }
        if let Some(message) = visitor.message.take() {
            root.insert("message".to_string(), Value::String(message));
        }

        // Event fields win over span fields of the same name
        let mut all_fields = Map::new();
        let (span_name, span_fields) = collect_scope_fields(ctx);
        if let Some(span_name) = span_name {
            all_fields.insert("span_name".to_string(), Value::String(span_name));
        }
        for (key, value) in span_fields {
            all_fields.insert(key, Value::String(value));
        }
        all_fields.extend(visitor.fields);
        if !all_fields.is_empty() {
            root.insert("fields".to_string(), Value::Object(all_fields));
        }

        let line = serde_json::to_string(&Value::Object(root)).map_err(|_| std::fmt::Error)?;
        writeln!(writer, "{}", line)
    }
}

/// Initialize the tracing subscriber with
/// - PrettyFormatter for console readability (when LOG_FORMAT != "json")
/// - JsonEventFormatter for json logging (when LOG_FORMAT = "json")
///
/// This will also install color_eyre to handle panics in the application
pub fn init_logging() -> color_eyre::Result<()> {
    color_eyre::install()?;

    // `RUST_LOG` wins when set and valid
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::builder().with_default_directive(Level::INFO.into()).parse(DEFAULT_FILTER)?,
    };

    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());
    let fmt_layer = if log_format == "json" {
        fmt::layer().event_format(JsonEventFormatter).boxed()
    } else {
        fmt::layer().event_format(PrettyFormatter).boxed()
    };

    let subscriber =
        Registry::default().with(env_filter).with(FieldCollectorLayer).with(fmt_layer).with(ErrorLayer::default());
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Short component label derived from the event target.
fn component_name(target: &str) -> &'static str {
    if target.starts_with("quest_points_ethereum_ledger_client") {
        "LEDGER"
    } else if target.starts_with("quest_points::worker") {
        "WORKER"
    } else if target.starts_with("quest_points::server") {
        "HTTP"
    } else if target.starts_with("quest_points::intake") || target.starts_with("quest_points::validators") {
        "INTAKE"
    } else if target.starts_with("quest_points::core") {
        "STORE"
    } else if target.starts_with("quest_points") {
        "-"
    } else {
        "EXTERNAL"
    }
}
