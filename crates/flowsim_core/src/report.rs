//! CSV report sinks
//!
//! A sink writes the header `date,available,value,cashflow,interest` on
//! `START` and one row per matching account-info message, with dollars at two
//! decimals and dates as `YYYY-MM-DD`.

use std::io::Write;

use tokio::sync::oneshot;
use tracing::{debug, error};

use crate::model::AccountInfo;
use crate::process::{Context, Handler, Message, Payload};

pub const HEADER: [&str; 5] = ["date", "available", "value", "cashflow", "interest"];

/// Which account-info stream a sink records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Daily,
    Monthly,
}

impl ReportKind {
    pub fn file_name(self) -> &'static str {
        match self {
            ReportKind::Daily => "daily.csv",
            ReportKind::Monthly => "monthly.csv",
        }
    }

    fn select(self, payload: &Payload) -> Option<&AccountInfo> {
        match (self, payload) {
            (ReportKind::Daily, Payload::DailyAccountInfo(info))
            | (ReportKind::Monthly, Payload::MonthlyAccountInfo(info)) => Some(info),
            _ => None,
        }
    }
}

/// Format an info snapshot as a CSV record.
pub fn record(info: &AccountInfo) -> [String; 5] {
    [
        info.date.strftime("%Y-%m-%d").to_string(),
        format!("{:.2}", info.available_cash.as_dollars()),
        format!("{:.2}", info.account_value.as_dollars()),
        format!("{:.2}", info.cash_flow.as_dollars()),
        format!("{:.2}", info.interest.as_dollars()),
    ]
}

pub struct ReportSink<W: Write + Send + 'static> {
    kind: ReportKind,
    writer: csv::Writer<W>,
    rows: usize,
    done: Option<oneshot::Sender<W>>,
}

impl<W: Write + Send + 'static> ReportSink<W> {
    pub fn new(kind: ReportKind, out: W) -> Self {
        Self {
            kind,
            writer: csv::WriterBuilder::new()
                .has_headers(false)
                .terminator(csv::Terminator::Any(b'\n'))
                .from_writer(out),
            rows: 0,
            done: None,
        }
    }

    /// Like [`ReportSink::new`], also returning a receiver for the flushed
    /// writer once the sink's process exits.
    pub fn returning(kind: ReportKind, out: W) -> (Self, oneshot::Receiver<W>) {
        let (tx, rx) = oneshot::channel();
        let mut sink = Self::new(kind, out);
        sink.done = Some(tx);
        (sink, rx)
    }

    pub fn kind(&self) -> ReportKind {
        self.kind
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn write_header(&mut self) -> csv::Result<()> {
        self.writer.write_record(HEADER)
    }

    pub fn write_info(&mut self, info: &AccountInfo) -> csv::Result<()> {
        self.writer.write_record(record(info))?;
        self.rows += 1;
        Ok(())
    }
}

impl<W: Write + Send + 'static> Handler for ReportSink<W> {
    fn handle(&mut self, _ctx: &mut Context, msg: &Message) {
        let result = match &msg.payload {
            Payload::Start => self.write_header(),
            payload => match self.kind.select(payload) {
                Some(info) => self.write_info(info),
                None => Ok(()),
            },
        };
        if let Err(err) = result {
            error!(report = self.kind.file_name(), %err, "failed to write report row");
        }
    }

    fn finish(self: Box<Self>) {
        let ReportSink {
            kind,
            writer,
            rows,
            done,
        } = *self;
        debug!(report = kind.file_name(), rows, "report closed");
        match writer.into_inner() {
            Ok(out) => {
                if let Some(done) = done {
                    let _ = done.send(out);
                }
            }
            Err(err) => error!(report = kind.file_name(), err = %err.error(), "failed to flush report"),
        }
    }
}
