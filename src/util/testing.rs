use std::collections::BTreeMap;
use std::env;
use std::sync::Once;
use tracing::{debug, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::domain::{BoxError, Payload};
use crate::Genealogy;

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        if env::var("RUST_LOG").is_err() {
            env::set_var("RUST_LOG", "trace");
        }
        // global logging subscriber, used by all tracing log macros
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// Payload that can always be built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Virus {
    id: String,
}

impl Payload for Virus {
    type Id = String;

    fn from_id(id: String) -> Result<Self, BoxError> {
        Ok(Self { id })
    }

    fn id(&self) -> &String {
        &self.id
    }
}

/// Payload whose construction fails for ids starting with `"bad"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragileVirus {
    id: String,
}

impl Payload for FragileVirus {
    type Id = String;

    fn from_id(id: String) -> Result<Self, BoxError> {
        if id.starts_with("bad") {
            return Err(format!("cannot culture {id}").into());
        }
        Ok(Self { id })
    }

    fn id(&self) -> &String {
        &self.id
    }
}

/// Observable state of a genealogy: every id with its parents and children.
pub type Snapshot<I> = BTreeMap<I, (Vec<I>, Vec<I>)>;

/// Capture everything a caller can observe, for before/after comparisons.
pub fn snapshot<P: Payload>(gen: &Genealogy<P>) -> Snapshot<P::Id> {
    gen.ids()
        .into_iter()
        .map(|id| {
            let parents: Vec<P::Id> = gen
                .parents(&id)
                .map(|p| p.iter().cloned().collect())
                .unwrap_or_default();
            let children: Vec<P::Id> = gen
                .children(&id)
                .map(|c| c.map(|payload| payload.id().clone()).collect())
                .unwrap_or_default();
            (id, (parents, children))
        })
        .collect()
}
