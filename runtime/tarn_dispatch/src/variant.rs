//! Candidate variants: the concrete implementation bodies a closure
//! type declares for its call operation.

use std::fmt;
use std::sync::Arc;

use tarn_object::{DispatchResult, Signature, Value};

use crate::closure::ClosureRef;

/// Host-supplied invocation thunk for one variant body.
///
/// The receiver is the closure the call is attributed to; it differs
/// from the declaring closure when a nested closure held in a property
/// is invoked as a method.
pub type VariantThunk = Arc<dyn Fn(&ClosureRef, &[Value]) -> DispatchResult + Send + Sync>;

/// One declared implementation body: its parameter signature plus the
/// opaque thunk that runs it. Immutable once registered on a class.
#[derive(Clone)]
pub struct VariantDef {
    signature: Signature,
    thunk: VariantThunk,
}

impl VariantDef {
    /// Register a body under the given signature.
    pub fn new(
        signature: Signature,
        thunk: impl Fn(&ClosureRef, &[Value]) -> DispatchResult + Send + Sync + 'static,
    ) -> Self {
        VariantDef {
            signature,
            thunk: Arc::new(thunk),
        }
    }

    /// The declared parameter signature.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub(crate) fn thunk(&self) -> &VariantThunk {
        &self.thunk
    }
}

impl fmt::Debug for VariantDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VariantDef{}", self.signature)
    }
}

/// Catalog entry in a built dispatch table: the signature of one
/// variant, indexed by its position in the catalog.
#[derive(Clone, Debug)]
pub struct Variant {
    signature: Signature,
}

impl Variant {
    pub(crate) fn new(signature: Signature) -> Self {
        Variant { signature }
    }

    /// The variant's parameter signature.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }
}
