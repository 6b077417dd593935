//! # Interaction System
//!
//! Matches player-initiated interactions (picking up an item, using an item on
//! an object, typing a command) to registered content handlers and sequences
//! them safely.
//!
//! ## Architecture
//!
//! - **HandlerRegistry**: hot-swappable, ordered handler snapshots
//! - **Matchers**: item, option and quest predicates
//! - **EligibilityResolver**: filters a snapshot and applies quest precedence
//! - **DispatchSequencer**: cancels older sequences, runs immediate handlers,
//!   gates the rest on a single walk
//! - **CancellationBus**: per-actor cancellation epochs
//! - **ActionPipeline**: one dispatcher per [`ActionKind`], fed from one catalog
//!
//! ## Usage
//!
//! ```rust,no_run
//! use interaction_system::*;
//! # fn services() -> DispatchServices { unimplemented!() }
//!
//! let pipeline = ActionPipeline::new(services(), DispatchSettings::default());
//!
//! let coins = InteractionHandler::builder(ActionKind::WorldItem, "pick-up-coins")
//!     .item_id(995)
//!     .option("pick-up")
//!     .walk_to(true)
//!     .action(|ctx| tracing::info!("{} picked up coins", ctx.actor))
//!     .build()?;
//! pipeline.load_plugins([coins]);
//!
//! let event = InteractionEvent::world_item(ActorId::new(), 995, Position::new(3222, 3218, 0), "pick-up");
//! let outcome = pipeline.call(&event);
//! # Ok::<(), InteractionError>(())
//! ```

pub mod cancellation;
pub mod collaborators;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod handler;
pub mod intake;
pub mod matchers;
pub mod pipeline;
pub mod registry;
pub mod resolver;
pub mod sequencer;
pub mod settings;
pub mod stats;
pub mod types;


pub use cancellation::{CancelToken, CancellationBus};
pub use collaborators::{ActorGateway, MovementOutcome, MovementService, QuestStateStore};
pub use dispatcher::{DispatchOutcome, DispatchServices, InteractionDispatcher};
pub use error::{IntakeRejection, InteractionError};
pub use event::{InteractionEvent, ItemSource, UsedItem, USE_OPTION};
pub use handler::{ActionFn, HandlerBuilder, InteractionContext, InteractionHandler, QuestRequirement};
pub use intake::{validate_used_item, InventoryView};
pub use pipeline::ActionPipeline;
pub use registry::{HandlerRegistry, HandlerSnapshot};
pub use resolver::{EligibilityResolver, Resolution};
pub use sequencer::{DispatchSequencer, PendingWalk, SequenceReport, WalkOutcome};
pub use settings::DispatchSettings;
pub use stats::{DispatchStats, StatsSnapshot};
pub use types::{ActionKind, ActorId, InteractionTarget, ItemId, NpcId, ObjectId, Position};
