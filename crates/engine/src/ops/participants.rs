use crate::{EngineError, Participant, ParticipantId, ResultEngine};

use super::{Engine, normalize_required_name};

impl Engine {
    /// Registers a participant so they can join groups.
    pub fn register_participant(&mut self, id: ParticipantId, name: &str) -> ResultEngine<()> {
        let name = normalize_required_name(name, "participant")?;
        if self.participants.contains_key(&id) {
            return Err(EngineError::InvalidInput(format!(
                "participant {id} already present"
            )));
        }
        self.participants
            .insert(id.clone(), Participant::new(id, name));
        Ok(())
    }

    pub fn participant(&self, id: &ParticipantId) -> ResultEngine<&Participant> {
        self.require_participant(id)
    }
}
