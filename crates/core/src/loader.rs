//! Candidate filtering across a session's config contexts
//!
//! A [`Loader`] owns the config contexts an application creates for one
//! session. Given the implementations discovered by the enumeration layer, it
//! keeps the ones that pass [`validate`] and reports why the others failed.

use serde::{Deserialize, Serialize};

use crate::capabilities::{
    validate, ConfigContext, ImplDescription, ImplementedFunctions, LibraryKind, SpecialConfig,
};
use crate::Result;

/// One discovered implementation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Display name (library file or implementation name)
    pub name: String,
    /// Library kind, `vpl` unless stated otherwise
    #[serde(default)]
    pub kind: LibraryKind,
    /// Self-reported capabilities
    #[serde(default)]
    pub description: ImplDescription,
    /// Exported entry points, if the implementation reports them
    #[serde(default)]
    pub functions: Option<ImplementedFunctions>,
}

impl Candidate {
    /// Create a VPL candidate without a function list.
    pub fn new(name: impl Into<String>, description: ImplDescription) -> Self {
        Self {
            name: name.into(),
            kind: LibraryKind::Vpl,
            description,
            functions: None,
        }
    }

    /// Set the library kind.
    pub fn with_kind(mut self, kind: LibraryKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the implemented function list.
    pub fn with_functions(mut self, functions: ImplementedFunctions) -> Self {
        self.functions = Some(functions);
        self
    }
}

/// An accepted candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Negotiated {
    /// Position in the candidate list passed to [`Loader::filter`]
    pub index: usize,
    /// Candidate name
    pub name: String,
    /// Values for finishing initialization
    pub special: SpecialConfig,
}

/// Owner of a session's config contexts.
#[derive(Debug, Clone, Default)]
pub struct Loader {
    configs: Vec<ConfigContext>,
}

impl Loader {
    /// Create a loader with no config contexts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new, empty config context and return it for filling in.
    pub fn create_config(&mut self) -> &mut ConfigContext {
        self.configs.push(ConfigContext::new());
        let index = self.configs.len() - 1;
        &mut self.configs[index]
    }

    /// Config contexts in creation order.
    pub fn configs(&self) -> &[ConfigContext] {
        &self.configs
    }

    /// Check one candidate against every config context.
    pub fn negotiate(&self, candidate: &Candidate) -> Result<SpecialConfig> {
        validate(
            &candidate.description,
            candidate.functions.as_ref(),
            &self.configs,
            candidate.kind,
        )
    }

    /// Keep the candidates that satisfy every config context, in order.
    ///
    /// Rejections are logged, not returned.
    pub fn filter(&self, candidates: &[Candidate]) -> Vec<Negotiated> {
        let mut accepted = Vec::new();

        for (index, candidate) in candidates.iter().enumerate() {
            match self.negotiate(candidate) {
                Ok(special) => {
                    tracing::info!("Accepted implementation '{}'", candidate.name);
                    accepted.push(Negotiated {
                        index,
                        name: candidate.name.clone(),
                        special,
                    });
                }
                Err(e) => {
                    tracing::info!("Rejected implementation '{}': {}", candidate.name, e);
                }
            }
        }

        tracing::debug!(
            "{} of {} implementation(s) match {} config(s)",
            accepted.len(),
            candidates.len(),
            self.configs.len()
        );
        accepted
    }
}
