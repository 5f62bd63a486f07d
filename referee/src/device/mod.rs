//! Bring-up and teardown of the referee device.
//!
//! Acquisition happens in three stages: the device identity, the six output
//! lines and the two edge lines. A failing stage unwinds every stage acquired
//! before it, in reverse order, so a failed [`Device::init`] leaves nothing
//! reserved behind.

use core::fmt;

use defmt::Format;
use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::{Arbiter, LedFrame, LightSink};

#[derive(Format, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitStage {
    DeviceIdentity,
    OutputLines,
    EdgeLines,
}

impl InitStage {
    /// Negative status reported when this stage fails.
    pub fn status(self) -> i32 {
        match self {
            InitStage::DeviceIdentity => -1,
            InitStage::OutputLines => -2,
            InitStage::EdgeLines => -3,
        }
    }
}

#[derive(Format, Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitError<E> {
    pub stage: InitStage,
    pub source: E,
}

impl<E> InitError<E> {
    pub fn status(&self) -> i32 {
        self.stage.status()
    }
}

impl<E: fmt::Debug> fmt::Display for InitError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.stage {
            InitStage::DeviceIdentity => "device identity",
            InitStage::OutputLines => "output lines",
            InitStage::EdgeLines => "edge lines",
        };
        write!(f, "failed to acquire {what}: {:?}", self.source)
    }
}

impl<E: fmt::Debug> core::error::Error for InitError<E> {}

/// The board the referee runs on.
///
/// Releases are infallible: teardown is best effort and never reports back.
/// Each release takes back what the matching reserve handed out, so the
/// resource is gone by the time the call returns.
pub trait Platform {
    type Sink: LightSink;
    /// Whatever the edge sources need to run, handed back to the caller.
    type EdgeLines;
    type Error;

    fn register_device(&mut self) -> Result<(), Self::Error>;
    fn reserve_outputs(&mut self) -> Result<Self::Sink, Self::Error>;
    fn reserve_edge_lines(&mut self) -> Result<Self::EdgeLines, Self::Error>;

    fn release_edge_lines(&mut self, lines: Self::EdgeLines);
    fn release_outputs(&mut self, sink: Self::Sink);
    fn unregister_device(&mut self);
}

pub struct Device<M: RawMutex, P: Platform> {
    platform: P,
    arbiter: Arbiter<M, P::Sink>,
}

impl<M: RawMutex, P: Platform> Device<M, P> {
    /// Acquires every resource the referee needs. Outputs start dark.
    pub fn init(mut platform: P) -> Result<(Self, P::EdgeLines), InitError<P::Error>> {
        platform.register_device().map_err(|source| InitError {
            stage: InitStage::DeviceIdentity,
            source,
        })?;

        let sink = match platform.reserve_outputs() {
            Ok(sink) => sink,
            Err(source) => {
                platform.unregister_device();
                return Err(InitError {
                    stage: InitStage::OutputLines,
                    source,
                });
            }
        };

        let edge_lines = match platform.reserve_edge_lines() {
            Ok(lines) => lines,
            Err(source) => {
                platform.release_outputs(sink);
                platform.unregister_device();
                return Err(InitError {
                    stage: InitStage::EdgeLines,
                    source,
                });
            }
        };

        let arbiter = Arbiter::new(sink);
        arbiter.force_frame(LedFrame::OFF);

        Ok((Self { platform, arbiter }, edge_lines))
    }

    pub fn arbiter(&self) -> &Arbiter<M, P::Sink> {
        &self.arbiter
    }

    /// Switches everything off and gives all resources back, newest first:
    /// the edge lines returned by [`Device::init`], the outputs, then the
    /// device identity. Returns how many edges were seen over the device's
    /// lifetime.
    pub fn shutdown(self, edge_lines: P::EdgeLines) -> u32 {
        let Self {
            mut platform,
            arbiter,
        } = self;

        let edges = arbiter.edge_count();
        arbiter.force_frame(LedFrame::OFF);

        platform.release_edge_lines(edge_lines);
        platform.release_outputs(arbiter.into_sink());
        platform.unregister_device();

        edges
    }
}
