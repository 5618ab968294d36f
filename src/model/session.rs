use log::warn;

use crate::model::plugin_params::PluginParams;
use crate::model::variables::VariableStore;

/// Everything the plugin commands read and write, passed explicitly to
/// each handler.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub params: PluginParams,
    pub variables: VariableStore,
    in_flight: usize,
}

impl Session {
    pub fn new(params: PluginParams) -> Self {
        Self {
            params,
            variables: VariableStore::new(),
            in_flight: 0,
        }
    }

    pub fn response_variable_id(&self) -> u32 {
        self.params.gpt_response_variable_id
    }

    /// Requests sent but not yet completed.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub(crate) fn begin_request(&mut self) {
        if self.in_flight > 0 {
            warn!(
                "{} chat request(s) still pending; replies will update the same variables in arrival order",
                self.in_flight
            );
        }
        self.in_flight += 1;
    }

    pub(crate) fn end_request(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    /// Forget requests whose replies can no longer arrive, e.g. after the
    /// worker was replaced. Returns how many were dropped.
    pub fn abandon_in_flight(&mut self) -> usize {
        if self.in_flight > 0 {
            warn!("{} chat request(s) abandoned without a reply", self.in_flight);
        }
        std::mem::take(&mut self.in_flight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abandoned_requests_clear_the_counter() {
        let mut session = Session::default();
        session.begin_request();
        session.begin_request();
        session.end_request();

        assert_eq!(session.abandon_in_flight(), 1);
        assert_eq!(session.in_flight(), 0);
        assert_eq!(session.abandon_in_flight(), 0);

        session.begin_request();
        assert_eq!(session.in_flight(), 1);
    }
}
