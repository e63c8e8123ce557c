//! GetHearingResultHandler - reads the hearing document.

use serde::Deserialize;

use crate::application::records::Records;
use crate::domain::foundation::SessionId;
use crate::domain::hearing::{HearingError, HearingResult};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GetHearingResultCommand {
    pub session_id: SessionId,
}

pub struct GetHearingResultHandler {
    records: Records,
}

impl GetHearingResultHandler {
    pub fn new(records: Records) -> Self {
        Self { records }
    }

    pub async fn handle(&self, cmd: GetHearingResultCommand) -> Result<HearingResult, HearingError> {
        self.records.load_hearing_result(&cmd.session_id).await
    }
}
