//! Built-in seed file templates.

/// GitHub Actions workflow whose single job passes or fails on purpose.
///
/// Runs on every push so Renovate's own branches receive a check result.
pub(super) const BRANCH_POLICY_WORKFLOW: &str = r#"name: Branch policy

on:
  push:
  pull_request:
    branches:
      - {{default_branch}}

jobs:
  branch-policy:
    runs-on: ubuntu-latest
    steps:
      - name: {{#if (eq outcome "success")}}Succeed{{else}}Fail{{/if}}
        run: exit {{#if (eq outcome "success")}}0{{else}}1{{/if}}
"#;

pub(super) const CODE_OWNERS: &str = r#"# Owners of every file in the repository
*{{#each owners}} {{this}}{{/each}}
"#;
