use std::time::Duration;

use serde::Deserialize;

use crate::direction::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AnimationKind {
    #[default]
    Slide,
    VerticalSlide,
    Rotate,
}

impl AnimationKind {
    pub fn id(self) -> &'static str {
        match self {
            Self::Slide => "slide",
            Self::VerticalSlide => "vertical-slide",
            Self::Rotate => "rotate",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "slide" => Some(Self::Slide),
            "vertical-slide" => Some(Self::VerticalSlide),
            "rotate" => Some(Self::Rotate),
            _ => None,
        }
    }

    fn transform_fn(self) -> &'static str {
        match self {
            Self::Slide => "translateX",
            Self::VerticalSlide => "translateY",
            Self::Rotate => "rotateY",
        }
    }

    fn max_offset(self) -> &'static str {
        match self {
            Self::Slide | Self::VerticalSlide => "100%",
            Self::Rotate => "180deg",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TimingCurve {
    #[default]
    Ease,
    EaseIn,
    EaseOut,
    EaseInOut,
    Linear,
}

impl TimingCurve {
    pub fn id(self) -> &'static str {
        match self {
            Self::Ease => "ease",
            Self::EaseIn => "ease-in",
            Self::EaseOut => "ease-out",
            Self::EaseInOut => "ease-in-out",
            Self::Linear => "linear",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ease" => Some(Self::Ease),
            "ease-in" => Some(Self::EaseIn),
            "ease-out" => Some(Self::EaseOut),
            "ease-in-out" => Some(Self::EaseInOut),
            "linear" => Some(Self::Linear),
            _ => None,
        }
    }
}

/// Transforms for the four marker classes of one direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformRules {
    pub direction: Direction,
    pub enter_start: String,
    pub enter_end: String,
    pub exit_start: String,
    pub exit_end: String,
    /// `transition` declaration; only the active direction carries one.
    pub transition: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSheet {
    pub kind: AnimationKind,
    pub active: Direction,
    pub forward: TransformRules,
    pub back: TransformRules,
}

pub fn style_rules(
    kind: AnimationKind,
    duration: Duration,
    curve: TimingCurve,
    direction: Direction,
) -> StyleSheet {
    let timing = format!("transform {}ms {}", duration.as_millis(), curve.id());
    let rules = |dir: Direction, sign_in: &str, sign_out: &str| {
        let f = kind.transform_fn();
        let max = kind.max_offset();
        TransformRules {
            direction: dir,
            enter_start: format!("{f}({sign_in}{max})"),
            enter_end: format!("{f}(0)"),
            exit_start: format!("{f}(0)"),
            exit_end: format!("{f}({sign_out}{max})"),
            transition: (dir == direction).then(|| timing.clone()),
        }
    };

    StyleSheet {
        kind,
        active: direction,
        forward: rules(Direction::Forward, "", "-"),
        back: rules(Direction::Back, "-", ""),
    }
}

impl StyleSheet {
    pub fn rules_for(&self, direction: Direction) -> Option<&TransformRules> {
        match direction {
            Direction::Forward => Some(&self.forward),
            Direction::Back => Some(&self.back),
            Direction::Undirected => None,
        }
    }

    /// Full CSS for a container carrying `<scope_class> <kind>` with `.item` children.
    pub fn to_css(&self, scope_class: &str) -> String {
        let root = format!(".{scope_class}.{}", self.kind.id());
        let mut lines = vec![
            format!(".{scope_class} {{ display: grid; }}"),
            format!(".{scope_class} > .item {{ grid-area: 1 / 1 / 2 / 2; }}"),
        ];
        match self.kind {
            AnimationKind::Slide | AnimationKind::VerticalSlide => {
                lines.push(format!("{root} {{ overflow: hidden; }}"));
            }
            AnimationKind::Rotate => {
                lines.push(format!("{root} {{ perspective: 2000px; }}"));
                lines.push(format!("{root} > .item {{ backface-visibility: hidden; }}"));
            }
        }

        for rules in [&self.back, &self.forward] {
            let dir = rules.direction.id();
            lines.push(format!("{root} > .{dir}-enter {{ transform: {}; }}", rules.enter_start));
            lines.push(format!(
                "{root} > .{dir}-enter-active {{ transform: {}; }}",
                rules.enter_end
            ));
            lines.push(format!("{root} > .{dir}-exit {{ transform: {}; }}", rules.exit_start));
            lines.push(format!(
                "{root} > .{dir}-exit-active {{ transform: {}; }}",
                rules.exit_end
            ));
            if let Some(transition) = &rules.transition {
                lines.push(format!(
                    ".{scope_class} > .item:not(:only-child).{dir}-enter-active, \
                     .{scope_class} > .item:not(:only-child).{dir}-exit-active \
                     {{ transition: {transition}; }}"
                ));
            }
        }

        let mut css = lines.join("\n");
        css.push('\n');
        css
    }
}
