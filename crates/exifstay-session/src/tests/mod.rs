//! Process-level tests driving sessions against a shell stand-in tool.

mod support;
