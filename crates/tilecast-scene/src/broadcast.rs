#![forbid(unsafe_code)]

//! Newline-delimited JSON broadcaster.
//!
//! Each [`Broadcaster::tick`] drains at most one [`SendBudget`] worth of ops
//! and textures from the scene and writes them as envelopes, one per line:
//!
//! ```text
//! {"event":"scene","payload":{"ops":[...]}}
//! {"event":"tex","payload":{"id":"a","image":"...","w":100,"h":20}}
//! ```
//!
//! With [`Broadcaster::with_texture_batching`] the textures of a tick go out
//! as one `tex_batch` line instead.
//!
//! The broadcaster keeps no scene state and gives no delivery guarantee;
//! subscribers that miss traffic send `sync_request`, which
//! [`Broadcaster::handle_inbound`] answers with [`Scene::resync`]. Input
//! from displays (`interact`) is handed back to the caller as [`Inbound`].

use std::io::{BufWriter, Write};

use tilecast_proto::{Envelope, InteractEvent, SceneBatch, SceneOp, TexBatch, TexPayload};
use tracing::{debug, debug_span, info, warn};

use crate::config::SendBudget;
use crate::content::TileContent;
use crate::counting_writer::CountingWriter;
use crate::error::BroadcastError;
use crate::scene::Scene;

/// What one tick put on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    pub ops: usize,
    pub textures: usize,
    pub bytes: u64,
}

impl TickReport {
    /// Nothing was sent.
    pub fn is_idle(&self) -> bool {
        self.ops == 0 && self.textures == 0
    }
}

/// Outcome of one inbound line.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    /// A display asked for the full scene; a resync is queued.
    Resync { device_id: String },
    /// Pointer input for the caller to route.
    Interact(InteractEvent),
    /// Blank line, sender-side event, or an event name this build does not know.
    Ignored,
}

impl Inbound {
    pub fn is_resync(&self) -> bool {
        matches!(self, Self::Resync { .. })
    }
}

/// Writes scene traffic to any [`Write`] sink.
#[derive(Debug)]
pub struct Broadcaster<W: Write> {
    writer: CountingWriter<BufWriter<W>>,
    budget: SendBudget,
    batch_textures: bool,
    total_bytes: u64,
    ticks: u64,
}

impl<W: Write> Broadcaster<W> {
    pub fn new(sink: W) -> Self {
        Self::with_budget(sink, SendBudget::default())
    }

    pub fn with_budget(sink: W, budget: SendBudget) -> Self {
        Self {
            writer: CountingWriter::new(BufWriter::new(sink)),
            budget,
            batch_textures: false,
            total_bytes: 0,
            ticks: 0,
        }
    }

    /// Send each tick's textures as a single `tex_batch` envelope.
    #[must_use]
    pub fn with_texture_batching(mut self, enabled: bool) -> Self {
        self.batch_textures = enabled;
        self
    }

    pub fn budget(&self) -> SendBudget {
        self.budget
    }

    pub fn set_budget(&mut self, budget: SendBudget) {
        self.budget = budget;
    }

    /// Bytes written over the broadcaster's lifetime.
    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    /// Drain one budget's worth of traffic and flush it.
    ///
    /// Ops go out as a single `scene` envelope (omitted when there are
    /// none), followed by one `tex` envelope per texture or a single
    /// `tex_batch` when batching is on.
    ///
    /// Drained traffic is not retained. If writing fails the scene is
    /// resynced before the error is returned, so the next successful tick
    /// rebuilds every created entity on the display.
    pub fn tick<D: TileContent>(&mut self, scene: &mut Scene<D>) -> Result<TickReport, BroadcastError> {
        self.ticks += 1;
        let _span = debug_span!("broadcast_tick", tick = self.ticks).entered();
        self.writer.reset_counter();

        let ops = scene.take_ops(self.budget.ops_per_tick);
        let textures = scene.take_textures(self.budget.textures_per_tick);
        let report = TickReport {
            ops: ops.len(),
            textures: textures.len(),
            bytes: 0,
        };

        if let Err(err) = self.write_tick(ops, textures) {
            warn!(error = %err, "tick failed, queueing resync");
            scene.resync();
            return Err(err);
        }

        let bytes = self.writer.bytes_written();
        self.total_bytes += bytes;
        if !report.is_idle() {
            debug!(ops = report.ops, textures = report.textures, bytes, "tick sent");
        }
        Ok(TickReport { bytes, ..report })
    }

    /// Tick until the scene's queues are empty. Returns the combined report.
    pub fn flush_scene<D: TileContent>(&mut self, scene: &mut Scene<D>) -> Result<TickReport, BroadcastError> {
        let mut total = TickReport::default();
        loop {
            let report = self.tick(scene)?;
            if report.is_idle() {
                return Ok(total);
            }
            total.ops += report.ops;
            total.textures += report.textures;
            total.bytes += report.bytes;
        }
    }

    /// Handle one inbound line.
    ///
    /// A `sync_request` queues a full resync. `interact` is returned for the
    /// caller to route. Blank lines, sender-side events and unknown event
    /// names are ignored; malformed JSON or a bad payload for a known event
    /// is an error.
    pub fn handle_inbound<D: TileContent>(
        &mut self,
        line: &str,
        scene: &mut Scene<D>,
    ) -> Result<Inbound, BroadcastError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Inbound::Ignored);
        }
        let envelope = match Envelope::from_json_str(line) {
            Ok(envelope) => envelope,
            Err(err) => {
                return match Envelope::peek_event(line) {
                    Some(event) if !Envelope::is_known_event(&event) => {
                        debug!(%event, "ignoring unknown inbound event");
                        Ok(Inbound::Ignored)
                    }
                    _ => Err(err.into()),
                };
            }
        };
        match envelope {
            Envelope::SyncRequest(req) => {
                info!(device = %req.device_id, timestamp = req.timestamp, "sync requested");
                scene.resync();
                Ok(Inbound::Resync { device_id: req.device_id })
            }
            Envelope::Interact(event) => {
                debug!(id = %event.id, kind = ?event.kind, "interaction");
                Ok(Inbound::Interact(event))
            }
            other => {
                debug!(event = other.event(), "ignoring inbound event");
                Ok(Inbound::Ignored)
            }
        }
    }

    fn write_tick(
        &mut self,
        ops: Vec<SceneOp>,
        textures: Vec<TexPayload>,
    ) -> Result<(), BroadcastError> {
        if !ops.is_empty() {
            self.write_envelope(&Envelope::Scene(SceneBatch { ops }))?;
        }
        if self.batch_textures {
            if !textures.is_empty() {
                self.write_envelope(&Envelope::TexBatch(TexBatch { textures }))?;
            }
        } else {
            for tex in textures {
                self.write_envelope(&Envelope::Tex(tex))?;
            }
        }
        self.writer.flush()?;
        Ok(())
    }

    fn write_envelope(&mut self, envelope: &Envelope) -> Result<(), BroadcastError> {
        let line = envelope.to_json_string()?;
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    /// Flush and return the sink.
    pub fn into_inner(self) -> Result<W, BroadcastError> {
        self.writer
            .into_inner()
            .into_inner()
            .map_err(|err| BroadcastError::Io(err.into_error()))
    }

    /// The sink (buffered bytes may not have reached it yet).
    pub fn sink(&self) -> &W {
        self.writer.inner().get_ref()
    }
}
