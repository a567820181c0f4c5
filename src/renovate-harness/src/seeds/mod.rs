//! Seed files that the harness itself knows how to write.
//!
//! Scenarios mostly seed opaque manifests, but branch-policy scenarios also
//! need a CI workflow with a known outcome and a CODEOWNERS file. Those are
//! rendered from Handlebars templates here.

mod error;
mod templates;

pub use error::SeedError;

use handlebars::{no_escape, Context, Handlebars, Helper, HelperResult, Output, RenderContext};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Repository path of the branch-policy workflow.
pub const WORKFLOW_PATH: &str = ".github/workflows/branch-policy.yml";

/// Repository path of the code owners file.
pub const CODE_OWNERS_PATH: &str = ".github/CODEOWNERS";

const WORKFLOW_TEMPLATE: &str = "branch-policy-workflow";
const CODE_OWNERS_TEMPLATE: &str = "code-owners";

/// Result the seeded CI check reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BranchPolicyOutcome {
    Success,
    Failure,
}

impl BranchPolicyOutcome {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }
}

/// Renders the built-in seed files.
pub struct SeedRenderer {
    handlebars: Handlebars<'static>,
}

impl SeedRenderer {
    /// Creates a renderer with every built-in template registered.
    ///
    /// # Errors
    ///
    /// Returns an error if a built-in template fails to compile.
    pub fn new() -> Result<Self, SeedError> {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(no_escape);
        handlebars.set_strict_mode(true);
        handlebars.register_helper("eq", Box::new(eq_helper));

        for (name, template) in [
            (WORKFLOW_TEMPLATE, templates::BRANCH_POLICY_WORKFLOW),
            (CODE_OWNERS_TEMPLATE, templates::CODE_OWNERS),
        ] {
            handlebars
                .register_template_string(name, template)
                .map_err(|e| SeedError::RegistrationError(Box::new(e)))?;
        }

        Ok(Self { handlebars })
    }

    /// Workflow that makes the branch policy check pass or fail.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn branch_policy_workflow(
        &self,
        outcome: BranchPolicyOutcome,
        default_branch: &str,
    ) -> Result<String, SeedError> {
        let data = json!({
            "outcome": outcome.as_str(),
            "default_branch": default_branch,
        });
        Ok(self.handlebars.render(WORKFLOW_TEMPLATE, &data)?)
    }

    /// CODEOWNERS assigning the whole repository to `owners`.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn code_owners(&self, owners: &[String]) -> Result<String, SeedError> {
        let data = json!({ "owners": owners });
        Ok(self.handlebars.render(CODE_OWNERS_TEMPLATE, &data)?)
    }
}

/// `{{#if (eq a "b")}}`
fn eq_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let a = h.param(0).and_then(|v| v.value().as_str());
    let b = h.param(1).and_then(|v| v.value().as_str());

    if matches!((a, b), (Some(a), Some(b)) if a == b) {
        out.write("true")?;
    }
    Ok(())
}
