use refuapp_api::{Body, Request, Unreachable};
use tracing::{debug, warn};
use url::Url;

use super::Session;
use crate::model::{CreateRefuge, Refuge, UpdateRefuge, is_valid_id};
use crate::normalize;
use crate::response::{
    CreateRefugeError, CreateRefugeResponse, DeleteRefugeError, DeleteRefugeResponse,
    GetAllRefugesResponse, GetRefugeError, GetRefugeResponse, UpdateRefugeError,
    UpdateRefugeResponse,
};

/// CRUD over `/refuges/`.
#[derive(Clone)]
pub struct RefugeService {
    session: Session,
}

fn invalid_id_message(id: &str) -> String {
    format!("'{id}' is not a valid refuge id")
}

impl RefugeService {
    pub(crate) fn new(session: Session) -> Self {
        Self { session }
    }

    /// `GET /refuges/`
    pub async fn get_all(&self) -> Result<GetAllRefugesResponse, Unreachable> {
        let reply = self
            .session
            .send(Request::get(self.session.endpoints.refuges()))
            .await?;
        Ok(normalize::get_all_refuges(reply))
    }

    /// `GET /refuges/{id}`. A malformed id never reaches the network.
    pub async fn get(&self, id: &str) -> Result<GetRefugeResponse, Unreachable> {
        if !is_valid_id(id) {
            debug!(id, "rejecting get for invalid id");
            return Ok(GetRefugeResponse::Error {
                error: GetRefugeError::ClientSentInvalidData {
                    message: invalid_id_message(id),
                },
            });
        }

        let reply = self
            .session
            .send(Request::get(self.session.endpoints.refuge(id)))
            .await?;
        Ok(normalize::get_refuge(reply))
    }

    /// `POST /refuges/`
    pub async fn create(&self, refuge: &CreateRefuge) -> Result<CreateRefugeResponse, Unreachable> {
        let body = match serde_json::to_value(refuge) {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "could not encode refuge");
                return Ok(CreateRefugeResponse::Error {
                    error: CreateRefugeError::ProgrammerSentInvalidData,
                });
            }
        };

        let reply = self
            .session
            .send(Request::post(self.session.endpoints.refuges(), Body::Json(body)))
            .await?;
        Ok(normalize::create_refuge(reply))
    }

    /// `PUT /refuges/{id}`. A malformed id never reaches the network.
    pub async fn update(&self, refuge: &UpdateRefuge) -> Result<UpdateRefugeResponse, Unreachable> {
        if !is_valid_id(&refuge.id) {
            debug!(id = %refuge.id, "rejecting update for invalid id");
            return Ok(UpdateRefugeResponse::Error {
                error: UpdateRefugeError::ClientSentInvalidData {
                    message: invalid_id_message(&refuge.id),
                },
            });
        }

        let body = match serde_json::to_value(refuge) {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "could not encode refuge");
                return Ok(UpdateRefugeResponse::Error {
                    error: UpdateRefugeError::ProgrammerSentInvalidData,
                });
            }
        };

        let reply = self
            .session
            .send(Request::put(
                self.session.endpoints.refuge(&refuge.id),
                Body::Json(body),
            ))
            .await?;
        Ok(normalize::update_refuge(reply))
    }

    /// `DELETE /refuges/{id}`. A malformed id never reaches the network.
    pub async fn delete(&self, id: &str) -> Result<DeleteRefugeResponse, Unreachable> {
        if !is_valid_id(id) {
            debug!(id, "rejecting delete for invalid id");
            return Ok(DeleteRefugeResponse::Error {
                error: DeleteRefugeError::ClientSentInvalidData {
                    message: invalid_id_message(id),
                },
            });
        }

        let reply = self
            .session
            .send(Request::delete(self.session.endpoints.refuge(id)))
            .await?;
        Ok(normalize::delete_refuge(reply))
    }

    /// Where the refuge's photo is served from.
    pub fn image_url(&self, refuge: &Refuge) -> Url {
        self.session.endpoints.refuge_image(&refuge.image)
    }
}
