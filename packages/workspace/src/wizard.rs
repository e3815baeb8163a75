//! Guided funnel creation: Details → Template → Review.
//!
//! Each step validates its own fields before `next` advances; a missing or
//! invalid field blocks with a field-level message and nothing else changes.

use funnel_catalog::TemplateType;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Details,
    Template,
    Review,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WizardError {
    #[error("{field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },
}

impl WizardError {
    fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn field(&self) -> &'static str {
        match self {
            WizardError::Validation { field, .. } => field,
        }
    }
}

/// Validated wizard result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunnelRequest {
    pub name: String,
    pub template_type: TemplateType,
}

#[derive(Debug, Clone)]
pub struct FunnelWizard {
    step: WizardStep,
    name: String,
    template: String,
}

impl Default for FunnelWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl FunnelWizard {
    pub fn new() -> Self {
        Self {
            step: WizardStep::Details,
            name: String::new(),
            template: String::new(),
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Template tag as picked (`SALES_FUNNEL`, ...)
    pub fn set_template(&mut self, tag: impl Into<String>) {
        self.template = tag.into();
    }

    /// Validate the current step and advance. Review is the last step.
    pub fn next(&mut self) -> Result<WizardStep, WizardError> {
        self.step = match self.step {
            WizardStep::Details => {
                self.validate_name()?;
                WizardStep::Template
            }
            WizardStep::Template => {
                self.validate_template()?;
                WizardStep::Review
            }
            WizardStep::Review => WizardStep::Review,
        };
        Ok(self.step)
    }

    pub fn back(&mut self) -> WizardStep {
        self.step = match self.step {
            WizardStep::Details | WizardStep::Template => WizardStep::Details,
            WizardStep::Review => WizardStep::Template,
        };
        self.step
    }

    /// Validate every step and produce the request
    pub fn finish(&self) -> Result<FunnelRequest, WizardError> {
        let name = self.validate_name()?;
        let template_type = self.validate_template()?;
        Ok(FunnelRequest {
            name,
            template_type,
        })
    }

    fn validate_name(&self) -> Result<String, WizardError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(WizardError::validation("name", "Funnel name is required"));
        }
        Ok(name.to_string())
    }

    fn validate_template(&self) -> Result<TemplateType, WizardError> {
        let tag = self.template.trim();
        if tag.is_empty() {
            return Err(WizardError::validation("template", "Pick a template"));
        }
        TemplateType::from_tag(tag)
            .ok_or_else(|| WizardError::validation("template", format!("Unknown template {}", tag)))
    }
}
