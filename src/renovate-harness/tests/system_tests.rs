//! Live scenarios against the shared test repository.
//!
//! Each test force-pushes the repository's default branch and runs the
//! Renovate container, so they are ignored by default and must run one at a
//! time:
//!
//! ```text
//! cargo test -p renovate-harness --test system_tests -- --ignored --test-threads=1
//! ```

use renovate_harness::{HarnessConfig, Scenario, ScenarioError};

async fn scenario() -> Result<Scenario, ScenarioError> {
    Scenario::create(HarnessConfig::default()).await
}

#[tokio::test]
#[ignore = "requires docker, network access and a GitHub token"]
async fn dotnet_sdk_minor_updates_automerge_and_major_updates_open_pull_requests(
) -> Result<(), ScenarioError> {
    let scenario = scenario().await?;
    scenario.add_successful_workflow_file()?;
    scenario.add_file("global.json", r#"{"sdk": {"version": "6.0.100"}}"#)?;
    scenario.add_file(
        "Dockerfile",
        "FROM mcr.microsoft.com/dotnet/sdk:6.0.100\nFROM mcr.microsoft.com/dotnet/aspnet:6.0.0\n",
    )?;

    scenario.push_files_on_default_branch().await?;
    scenario.run_automerge_protocol().await?;

    scenario
        .assert_pull_requests(
            "
            - Title: 'chore(deps): update dotnet-sdk to redacted(major)'
              Labels:
              - renovate
              PackageUpdates:
              - Package: dotnet-sdk
                Type: dotnet-sdk
                Update: major
              - Package: mcr.microsoft.com/dotnet/aspnet
                Type: final
                Update: major
              - Package: mcr.microsoft.com/dotnet/sdk
                Type: stage
                Update: major
            ",
        )
        .await?;
    scenario
        .assert_commits(
            "
            - Message: 'chore(deps): update dotnet-sdk'
            - Message: IDP ScaffoldIt automated test
            ",
        )
        .await?;

    scenario.close()
}

#[tokio::test]
#[ignore = "requires docker, network access and a GitHub token"]
async fn hangfire_updates_are_grouped_in_one_pull_request() -> Result<(), ScenarioError> {
    let scenario = scenario().await?;
    scenario.add_file(
        "project.csproj",
        r#"<Project Sdk="Microsoft.NET.Sdk">
  <ItemGroup>
    <PackageReference Include="Hangfire" Version="1.7.1" />
    <PackageReference Include="Hangfire.AspNetCore" Version="1.7.1" />
    <PackageReference Include="Hangfire.Core" Version="1.7.1" />
    <PackageReference Include="Hangfire.NetCore" Version="1.7.1" />
    <PackageReference Include="Hangfire.SqlServer" Version="1.7.1" />
  </ItemGroup>
</Project>
"#,
    )?;

    scenario.push_files_on_default_branch().await?;
    scenario.run_renovate().await?;

    scenario
        .assert_pull_requests(
            "
            - Title: 'chore(deps): update hangfire monorepo to redacted'
              Labels:
              - renovate
              PackageUpdates:
              - Package: Hangfire
                Type: nuget
                Update: minor
              - Package: Hangfire.AspNetCore
                Type: nuget
                Update: minor
              - Package: Hangfire.Core
                Type: nuget
                Update: minor
              - Package: Hangfire.NetCore
                Type: nuget
                Update: minor
              - Package: Hangfire.SqlServer
                Type: nuget
                Update: minor
            ",
        )
        .await?;

    scenario.close()
}

#[tokio::test]
#[ignore = "requires docker, network access and a GitHub token"]
async fn mongodb_minor_updates_automerge_as_one_commit() -> Result<(), ScenarioError> {
    let scenario = scenario().await?;
    scenario.add_successful_workflow_file()?;
    scenario.add_file(
        "project.csproj",
        r#"<Project Sdk="Microsoft.NET.Sdk">
  <ItemGroup>
    <PackageReference Include="MongoDB.Bson" Version="2.27.0" />
    <PackageReference Include="MongoDB.Driver" Version="2.27.0" />
    <PackageReference Include="MongoDB.Driver.Core" Version="2.27.0" />
  </ItemGroup>
</Project>
"#,
    )?;

    scenario.push_files_on_default_branch().await?;
    scenario.run_automerge_protocol().await?;

    scenario
        .assert_commits(
            "
            - Message: 'chore(deps): update mongodb monorepo to redacted'
            - Message: IDP ScaffoldIt automated test
            ",
        )
        .await?;

    scenario.close()
}

#[tokio::test]
#[ignore = "requires docker, network access and a GitHub token"]
async fn ranged_npm_dependencies_are_pinned_in_one_pull_request() -> Result<(), ScenarioError> {
    let scenario = scenario().await?;
    scenario.add_file(
        "package.json",
        r#"{
  "dependencies": {
    "@azure/msal-browser": "^3.13.0",
    "@azure/msal-react": "~2.0.15"
  },
  "devDependencies": {
    "@storybook/addon-essentials": "^8.0.10",
    "@storybook/addon-interactions": "~8.0.10"
  }
}
"#,
    )?;

    scenario.push_files_on_default_branch().await?;
    scenario.run_renovate().await?;

    scenario
        .assert_pull_requests(
            "
            - Title: 'fix(deps): pin dependencies'
              Labels:
              - renovate
              PackageUpdates:
              - Package: '@azure/msal-browser'
                Type: dependencies
                Update: pin
              - Package: '@azure/msal-react'
                Type: dependencies
                Update: pin
              - Package: '@storybook/addon-essentials'
                Type: devDependencies
                Update: pin
              - Package: '@storybook/addon-interactions'
                Type: devDependencies
                Update: pin
            ",
        )
        .await?;

    scenario.close()
}

#[tokio::test]
#[ignore = "requires docker, network access and a GitHub token"]
async fn microsoft_major_updates_open_pull_request_and_minor_updates_automerge(
) -> Result<(), ScenarioError> {
    let scenario = scenario().await?;
    scenario.add_successful_workflow_file()?;
    scenario.add_file(
        "project.csproj",
        r#"<Project Sdk="Microsoft.NET.Sdk">
  <ItemGroup>
    <PackageReference Include="System.Text.Json" Version="7.0.0" />
    <PackageReference Include="Microsoft.ApplicationInsights.AspNetCore" Version="1.0.2" />
    <PackageReference Include="microsoft.AspNetCore.Authentication.OpenIdConnect" Version="7.0.0" />
    <PackageReference Include="Microsoft.Azure.AppConfiguration.AspNetCore" Version="7.0.0" />
    <PackageReference Include="Microsoft.CodeAnalysis.PublicApiAnalyzers" Version="3.3.4">
      <PrivateAssets>all</PrivateAssets>
      <IncludeAssets>runtime; build; native; contentfiles; analyzers; buildtransitive</IncludeAssets>
    </PackageReference>
  </ItemGroup>
</Project>
"#,
    )?;

    scenario.push_files_on_default_branch().await?;
    scenario.run_automerge_protocol().await?;

    scenario
        .assert_pull_requests(
            "
            - Title: 'chore(deps): update dependency system.text.json to redacted[security]'
              Labels:
              - security
              PackageUpdates:
              - Package: System.Text.Json
                Type: nuget
                Update: major
            - Title: 'chore(deps): update microsoft (major)'
              Labels:
              - renovate
              PackageUpdates:
              - Package: Microsoft.ApplicationInsights.AspNetCore
                Type: nuget
                Update: major
              - Package: microsoft.AspNetCore.Authentication.OpenIdConnect
                Type: nuget
                Update: major
            ",
        )
        .await?;
    scenario
        .assert_commits(
            "
            - Message: 'chore(deps): update microsoft'
            - Message: IDP ScaffoldIt automated test
            ",
        )
        .await?;

    scenario.close()
}

#[tokio::test]
#[ignore = "requires docker, network access and a GitHub token"]
async fn mixed_updates_open_several_pull_requests_and_automerge_microsoft_minor(
) -> Result<(), ScenarioError> {
    let scenario = scenario().await?;
    scenario.add_successful_workflow_file()?;
    scenario.add_file(
        "project.csproj",
        r#"<Project Sdk="Microsoft.NET.Sdk">
  <ItemGroup>
    <PackageReference Include="Hangfire.NetCore" Version="1.7.1" />
    <PackageReference Include="Microsoft.Extensions.Logging.Abstractions" Version="8.0.0" />
    <PackageReference Include="Workleap.Extensions.Configuration.Substitution" Version="1.1.2" />
  </ItemGroup>
</Project>
"#,
    )?;
    scenario.add_file(
        "package.json",
        r#"{
  "dependencies": {
    "@squide/core": "5.2.0"
  }
}
"#,
    )?;

    scenario.push_files_on_default_branch().await?;
    scenario.run_automerge_protocol().await?;

    scenario
        .assert_pull_requests(
            "
            - Title: 'chore(deps): update dependency hangfire.netcore to redacted'
              Labels:
              - renovate
              PackageUpdates:
              - Package: Hangfire.NetCore
                Type: nuget
                Update: minor
            - Title: 'chore(deps): update dependency workleap.extensions.configuration.substitution to redacted'
              Labels:
              - renovate
              PackageUpdates:
              - Package: Workleap.Extensions.Configuration.Substitution
                Type: nuget
                Update: patch
            - Title: 'fix(deps): update dependency @squide/core to redacted'
              Labels:
              - renovate
              PackageUpdates:
              - Package: '@squide/core'
                Type: dependencies
                Update: minor
            ",
        )
        .await?;
    scenario
        .assert_commits(
            "
            - Message: 'chore(deps): update dependency microsoft.extensions.logging.abstractions to redacted'
            - Message: IDP ScaffoldIt automated test
            ",
        )
        .await?;

    scenario.close()
}

#[tokio::test]
#[ignore = "requires docker, network access and a GitHub token"]
async fn microsoft_minor_update_is_pushed_on_default_branch_when_ci_succeeds(
) -> Result<(), ScenarioError> {
    let scenario = scenario().await?;
    scenario.add_successful_workflow_file()?;
    scenario.add_code_owners_file()?;
    scenario.add_file(
        "project.csproj",
        r#"<Project Sdk="Microsoft.NET.Sdk">
  <ItemGroup>
    <PackageReference Include="System.Text.Json" Version="8.0.0" />
  </ItemGroup>
</Project>
"#,
    )?;

    scenario.push_files_on_default_branch().await?;
    scenario.run_automerge_protocol().await?;

    scenario
        .assert_commits(
            "
            - Message: 'chore(deps): update dependency system.text.json to redacted[security]'
            - Message: IDP ScaffoldIt automated test
            ",
        )
        .await?;

    scenario.close()
}

#[tokio::test]
#[ignore = "requires docker, network access and a GitHub token"]
async fn microsoft_minor_update_falls_back_to_pull_request_when_ci_fails(
) -> Result<(), ScenarioError> {
    let scenario = scenario().await?;
    scenario.add_failing_workflow_file()?;
    scenario.add_code_owners_file()?;
    scenario.add_file(
        "project.csproj",
        r#"<Project Sdk="Microsoft.NET.Sdk">
  <ItemGroup>
    <PackageReference Include="System.Text.Json" Version="8.0.0" />
  </ItemGroup>
</Project>
"#,
    )?;

    scenario.push_files_on_default_branch().await?;
    scenario.run_automerge_protocol().await?;

    scenario
        .assert_pull_requests(
            "
            - Title: 'chore(deps): update dependency system.text.json to redacted[security]'
              Labels:
              - security
              PackageUpdates:
              - Package: System.Text.Json
                Type: nuget
                Update: patch
              IsAutoMergeEnabled: true
            ",
        )
        .await?;

    scenario.close()
}

#[tokio::test]
#[ignore = "requires docker, network access and a GitHub token"]
async fn gitversion_major_update_is_disabled() -> Result<(), ScenarioError> {
    let scenario = scenario().await?;
    scenario.add_file(
        "project.csproj",
        r#"<Project Sdk="Microsoft.NET.Sdk">
  <ItemGroup>
    <PackageReference Include="GitVersion.MsBuild" Version="5.12.0" />
  </ItemGroup>
</Project>
"#,
    )?;

    scenario.push_files_on_default_branch().await?;
    scenario.run_renovate().await?;

    scenario.assert_pull_requests("[]").await?;

    scenario.close()
}
