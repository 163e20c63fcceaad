use crate::PreviewResult;

/// What the front-end is currently showing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UiState {
    #[default]
    Idle,
    Loading,
    Success(Vec<PreviewResult>),
    Error,
}

impl UiState {
    pub fn is_loading(&self) -> bool {
        matches!(self, UiState::Loading)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, UiState::Error)
    }

    pub fn results(&self) -> &[PreviewResult] {
        match self {
            UiState::Success(results) => results,
            _ => &[],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            UiState::Idle => "idle",
            UiState::Loading => "loading",
            UiState::Success(_) => "success",
            UiState::Error => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_results_only_in_success() {
        let result = PreviewResult {
            url: "https://example.com".into(),
            ..Default::default()
        };
        assert_eq!(UiState::Success(vec![result.clone()]).results(), &[result]);
        assert!(UiState::Idle.results().is_empty());
        assert!(UiState::Loading.results().is_empty());
        assert!(UiState::Error.results().is_empty());
    }

    #[test]
    fn test_default_is_idle() {
        assert_eq!(UiState::default(), UiState::Idle);
        assert_eq!(UiState::default().name(), "idle");
    }
}
