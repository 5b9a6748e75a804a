//! Prompt construction for the commit analysis session.

use std::path::Path;

/// Marker the agent must print before its final commit message.
pub const COMMIT_MESSAGE_MARKER: &str = "COMMIT_MESSAGE:";

/// System prompt for the analysis session.
pub const SYSTEM_PROMPT: &str = r#"You are an expert software engineer who analyzes code changes and writes excellent git commit messages.

Your goal: produce a clear, accurate commit message that captures the intent of the changes.

## Tools
- Bash: run git commands (git status, git diff, git log, ...) and other shell commands
- Read: read any file in the repository for context
- Grep: search for patterns across files to find relationships
- Glob: find files matching patterns

## Analysis Approach (use your judgment)
1. See which files changed (git status, git diff)
2. For significant changes, READ the modified files to understand the purpose of the touched code and how it fits the codebase
3. Search for related code to understand dependencies and impact
4. Check git history when the trajectory of a change matters
5. Decide the kind of change: feat, fix, refactor, docs, test, chore, style, perf

## Commit Message Rules
- First line: under 50 characters, imperative mood, Conventional Commits prefix (feat:, fix:, docs:, refactor:, test:, chore:, style:, perf:)
- Be specific; avoid vague verbs such as "update", "change", "modify"
- Describe WHAT changed and WHY, not HOW
- For several logical changes, add a body with bullet points
- Ground the message in an understanding of the code, not only the diff surface

### Examples
- feat: add JWT-based authentication with refresh tokens
- fix: close idle connections to stop pool memory leak
- refactor: extract user validation into its own service
- perf: add composite index on user_email

## Output Format
When your analysis is done, print the final commit message in exactly this form:

COMMIT_MESSAGE:
<your commit message here>

Everything after COMMIT_MESSAGE: is used verbatim as the commit message."#;

/// Build the task prompt for analyzing the repository at `working_directory`.
pub fn build_task_prompt(working_directory: &Path, staged_only: bool) -> String {
    let scope = if staged_only {
        "staged changes only (git diff --cached)"
    } else {
        "all uncommitted changes (git diff)"
    };
    let diff_command = if staged_only {
        "git diff --cached"
    } else {
        "git diff"
    };

    format!(
        r#"Analyze the changes in this git repository and write an excellent commit message.

## Context
- Working directory: {workdir}
- Analysis scope: {scope}
- Available tools: Bash, Read, Grep, Glob

## Task
1. Investigate the changes thoroughly with whatever tools and commands you need.
2. Understand the INTENT and IMPACT of the changes, not just the surface diff.
3. Read relevant files to understand context and purpose.
4. Write a commit message that accurately reflects what changed and why.

## Suggestions (not requirements)
- Start with `git status` and `{diff_command}`
- For non-trivial changes, READ the modified files
- Use grep to find callers and related code

When you are confident you understand the changes, output the message in this exact format:

{marker}
<your commit message>

Everything after "{marker}" becomes the final commit message.
Begin your analysis now."#,
        workdir = working_directory.display(),
        scope = scope,
        diff_command = diff_command,
        marker = COMMIT_MESSAGE_MARKER,
    )
}
