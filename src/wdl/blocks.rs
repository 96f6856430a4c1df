//! Lexical segmentation of WDL source into task and workflow blocks.
//!
//! Blocks are recognized only by an unindented line whose first token is
//! `task` or `workflow`. Nothing else of the WDL grammar is understood, so a
//! line inside a command body that happens to start with `task` will open a
//! new block. Callers only see [`split_blocks`], so a grammar-aware splitter
//! can replace this one without touching them.

/// Kind of a top-level block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Task,
    Workflow,
}

/// One top-level block with its raw text (line endings preserved).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    /// 1-based line number of the block's first line.
    pub line: usize,
    pub text: String,
}

/// Why a source could not be segmented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitError {
    pub line: usize,
    pub message: String,
}

fn starts_with_token(line: &str, token: &str) -> bool {
    line.strip_prefix(token)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
}

/// Split lines (each including its line terminator) into blocks.
///
/// - lines before the first `task`/`workflow` line are ignored
/// - a `task` line closes the open task and opens a new one
/// - a `workflow` line closes the open task; it and every following line
///   belong to the workflow block
/// - a task still open at the end of input is an error, since nothing
///   terminated it
pub fn split_blocks<'a, I>(lines: I) -> Result<Vec<Block>, SplitError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut blocks = Vec::new();
    let mut current: Option<Block> = None;

    for (idx, line) in lines.into_iter().enumerate() {
        let lineno = idx + 1;

        if let Some(block) = current.as_mut()
            && block.kind == BlockKind::Workflow
        {
            block.text.push_str(line);
            continue;
        }

        let kind = if starts_with_token(line, "task") {
            Some(BlockKind::Task)
        } else if starts_with_token(line, "workflow") {
            Some(BlockKind::Workflow)
        } else {
            None
        };

        match kind {
            Some(kind) => {
                if let Some(done) = current.take() {
                    blocks.push(done);
                }
                current = Some(Block {
                    kind,
                    line: lineno,
                    text: line.to_string(),
                });
            }
            None => {
                if let Some(block) = current.as_mut() {
                    block.text.push_str(line);
                }
            }
        }
    }

    match current {
        Some(block) if block.kind == BlockKind::Task => Err(SplitError {
            line: block.line,
            message: format!(
                "task block starting at line {} is not followed by another task or a workflow",
                block.line
            ),
        }),
        Some(block) => {
            blocks.push(block);
            Ok(blocks)
        }
        None => Ok(blocks),
    }
}
