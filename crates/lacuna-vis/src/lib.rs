//! Lacuna Algorithm Visualization
//!
//! Step-by-step playback of the in-place "find all missing numbers"
//! algorithm, rendered into a retained scene graph.
//!
//! # Architecture
//!
//! - **Timeline**: runs the algorithm once and records every step
//! - **Playback**: bounded navigation over the recorded steps
//! - **Render**: projects the current step onto a [`Scene`](lacuna_scene::Scene)
//! - **Session**: single-writer actor owning playback, scene and the autoplay timer
//! - **Server**: thin HTTP shell dispatching intents to the session
//!
//! # Usage
//!
//! ```
//! use lacuna_vis::{Intent, Seed, Session};
//!
//! let mut session = Session::new(Seed::default());
//! session.dispatch(Intent::Seek { step: 999 }).unwrap();
//!
//! assert_eq!(session.status().current_step, 16);
//! assert_eq!(session.playback().timeline().result(), &[5, 6]);
//! ```

mod autoplay;
mod config;
mod error;
mod playback;
mod render;
mod server;
mod session;
mod timeline;

pub use autoplay::{Autoplay, Ticker};
pub use config::{parse_seed, VisConfig};
pub use error::{Error, Result};
pub use playback::{
    Playback, PlaybackStatus, TickOutcome, BASE_TICK, DEFAULT_SPEED, MAX_TICK, MIN_TICK,
};
pub use render::render;
pub use server::VisServer;
pub use session::{spawn_session, Intent, Session, SessionHandle};
pub use timeline::{Phase, Seed, Timeline, DEFAULT_SEED};
