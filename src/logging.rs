//! Structured planner events on the `log` facade.
//!
//! Every line reads `event=<name> [component=<stage>] key=value ...` under the
//! single [`LOG_TARGET`].

use std::fmt;

/// Single logging target for the organizer.
pub(crate) const LOG_TARGET: &str = "shard_organizer";

/// Pipeline stage a log line comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct LogContext {
    component: Option<&'static str>,
}

impl LogContext {
    /// Lines carrying no stage tag.
    pub(crate) const NONE: LogContext = LogContext { component: None };

    /// Lines tagged with `component=<name>`.
    pub(crate) const fn component(name: &'static str) -> Self {
        Self {
            component: Some(name),
        }
    }
}

impl fmt::Display for LogContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.component {
            Some(name) => write!(f, " component={name}"),
            None => Ok(()),
        }
    }
}

macro_rules! organizer_log {
    ($level:expr, ctx: $ctx:expr, $event:expr, $fmt:expr $(, $args:expr)* $(,)?) => {{
        let level = $level;
        if log::log_enabled!(target: crate::logging::LOG_TARGET, level) {
            log::log!(
                target: crate::logging::LOG_TARGET,
                level,
                "event={}{} {}",
                $event,
                $ctx,
                format_args!($fmt $(, $args)*)
            );
        }
    }};
    ($level:expr, $event:expr, $fmt:expr $(, $args:expr)* $(,)?) => {
        crate::logging::organizer_log!(
            $level,
            ctx: crate::logging::LogContext::NONE,
            $event,
            $fmt
            $(, $args)*
        )
    };
}

pub(crate) use organizer_log;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_renders_as_component_tag() {
        assert_eq!(LogContext::NONE.to_string(), "");
        assert_eq!(
            LogContext::component("stats_loader").to_string(),
            " component=stats_loader"
        );
    }

    #[test]
    fn macro_accepts_both_forms() {
        organizer_log!(log::Level::Trace, "noop", "shards={}", 0);
        organizer_log!(
            log::Level::Trace,
            ctx: LogContext::component("test"),
            "noop",
            "shards={}",
            0,
        );
    }
}
