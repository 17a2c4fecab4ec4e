//! Step-ordered isolation procedure generation.

use crate::classify::is_drain_tag;
use crate::error::Result;
use crate::search::{FlowDirection, IsolationCandidate, IsolationResult};
use serde::{Deserialize, Serialize};

const VERIFY_KO: &str = "압력계 확인 - 잔압 0 확인 후 작업 시작";
const VERIFY_EN: &str = "Check pressure gauge - Verify zero pressure before starting work";

/// Operator action for a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StepAction {
    Close,
    Open,
    Verify,
}

impl std::fmt::Display for StepAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepAction::Close => write!(f, "CLOSE"),
            StepAction::Open => write!(f, "OPEN"),
            StepAction::Verify => write!(f, "VERIFY"),
        }
    }
}

/// Where the valve of a step sits relative to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepDirection {
    Upstream,
    Downstream,
    Drain,
}

impl From<FlowDirection> for StepDirection {
    fn from(direction: FlowDirection) -> Self {
        match direction {
            FlowDirection::Upstream => StepDirection::Upstream,
            FlowDirection::Downstream => StepDirection::Downstream,
        }
    }
}

/// One step of an isolation procedure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// 1-based step number.
    pub step: usize,
    pub action: StepAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valve: Option<String>,
    /// Valve type name, or `"drain"` for the drain step.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub valve_type: Option<String>,
    pub description_ko: String,
    pub description_en: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<StepDirection>,
}

/// Ordered operator actions isolating one target valve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Procedure {
    pub target: String,
    pub steps: Vec<Step>,
}

impl Procedure {
    /// Steps with a given action.
    pub fn steps_with(&self, action: StepAction) -> impl Iterator<Item = &Step> {
        self.steps.iter().filter(move |s| s.action == action)
    }

    /// Operator listing, one line per step (English descriptions).
    pub fn render_text(&self) -> String {
        self.steps
            .iter()
            .map(|s| match &s.valve {
                Some(valve) => format!("{}. [{}] {} - {}", s.step, s.action, valve, s.description_en),
                None => format!("{}. [{}] {}", s.step, s.action, s.description_en),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn close_step(step: usize, candidate: &IsolationCandidate) -> Step {
    let type_name = candidate.component_type.as_str();
    let (side_ko, side_en) = match candidate.direction {
        FlowDirection::Upstream => ("상류(전단)", "upstream"),
        FlowDirection::Downstream => ("하류(후단)", "downstream"),
    };
    Step {
        step,
        action: StepAction::Close,
        valve: Some(candidate.tag.clone()),
        valve_type: Some(type_name.to_string()),
        description_ko: format!("{} {} 밸브 {} 폐쇄", side_ko, type_name, candidate.tag),
        description_en: format!("Close {} {} valve {}", side_en, type_name, candidate.tag),
        direction: Some(candidate.direction.into()),
    }
}

fn drain_step(step: usize, tag: &str) -> Step {
    Step {
        step,
        action: StepAction::Open,
        valve: Some(tag.to_string()),
        valve_type: Some("drain".to_string()),
        description_ko: format!("드레인 밸브 {} 개방 (잔압 해소)", tag),
        description_en: format!("Open drain valve {} (release residual pressure)", tag),
        direction: Some(StepDirection::Drain),
    }
}

fn verify_step(step: usize) -> Step {
    Step {
        step,
        action: StepAction::Verify,
        valve: None,
        valve_type: None,
        description_ko: VERIFY_KO.to_string(),
        description_en: VERIFY_EN.to_string(),
        direction: None,
    }
}

/// Build the procedure for a search result.
///
/// Order is fixed: close upstream valves (closest first), close downstream
/// valves, open the first connected drain valve not already closed, then
/// verify zero residual pressure.
pub fn generate_procedure(result: &IsolationResult) -> Procedure {
    let mut steps: Vec<Step> = Vec::new();

    for candidate in result.upstream.iter().chain(result.downstream.iter()) {
        steps.push(close_step(steps.len() + 1, candidate));
    }

    let drain = result
        .all_connected
        .iter()
        .find(|t| is_drain_tag(t) && !result.candidates().any(|c| &c.tag == *t));
    if let Some(drain) = drain {
        steps.push(drain_step(steps.len() + 1, drain));
    }

    steps.push(verify_step(steps.len() + 1));

    Procedure {
        target: result.target.clone(),
        steps,
    }
}

/// Build a procedure, passing a failed search through unchanged.
pub fn procedure_for(outcome: Result<IsolationResult>) -> Result<Procedure> {
    outcome.map(|result| generate_procedure(&result))
}
