use std::collections::{BTreeMap, BTreeSet};

use anyhow::Result;

use super::super::args::CheckCommand;
use super::{
    helper::finish,
    {CheckSummary, CommandResult, CommandSummary},
};

use crate::{
    core::{CheckContext, ConfigOverrides},
    issues::{Issue, ParseErrorIssue},
    rules::analyze,
};

pub fn check(cmd: CheckCommand) -> Result<CommandResult> {
    let args = &cmd.args;
    let overrides = ConfigOverrides {
        strict: args.strict,
        no_fallbacks: args.no_fallbacks,
    };
    let ctx = CheckContext::new(&args.common.path, overrides, args.common.verbose)?;

    let mut all_issues: Vec<Issue> = Vec::new();
    let mut skipped: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    for scope in &ctx.scopes {
        let result = analyze(
            &scope.usage_records,
            &scope.declared,
            &scope.example,
            &ctx.config,
        );
        all_issues.extend(result.issues);
        // The same name can be skipped in several scopes; report it once.
        for (category, names) in result.skipped {
            skipped.entry(category).or_default().extend(names);
        }
    }

    all_issues.extend(ctx.warnings.iter().map(|w| {
        Issue::ParseError(ParseErrorIssue {
            file_path: w.path.clone(),
            error: w.message.clone(),
        })
    }));

    let skipped = skipped
        .into_iter()
        .map(|(category, names)| (category, names.into_iter().collect()))
        .collect();

    Ok(finish(
        CommandSummary::Check(CheckSummary { skipped }),
        all_issues,
        ctx.source_files_checked,
        ctx.declaration_files_checked,
        args.ci,
    ))
}
