// ── Result normalizer ──
//
// Pure functions turning a reachable `Reply` into an operation result.
// Connectivity is settled before this point: only HTTP responses get
// here.

use refuapp_api::Reply;
use serde::de::DeserializeOwned;

use crate::classify::{Payload, Validate, classify_failure, classify_payload};
use crate::response::{
    AuthenticationResponse, CreateRefugeResponse, DeleteRefugeResponse, GetAllRefugesResponse,
    GetRefugeResponse, OperationResponse, PostImageResponse, UpdateRefugeResponse,
};

/// Classify a reply into any operation result.
pub fn normalize<R>(reply: Reply) -> R
where
    R: OperationResponse,
    R::Data: DeserializeOwned + Validate,
{
    match reply {
        Reply::Success(body) => match classify_payload::<R::Data>(body) {
            Payload::Valid(data) => R::success(data),
            Payload::Malformed => R::error(R::server_sent_malformed_data()),
        },
        Reply::Failure { status, body } => R::error(classify_failure(status, &body).into()),
    }
}

pub fn get_all_refuges(reply: Reply) -> GetAllRefugesResponse {
    normalize(reply)
}

pub fn get_refuge(reply: Reply) -> GetRefugeResponse {
    normalize(reply)
}

pub fn create_refuge(reply: Reply) -> CreateRefugeResponse {
    normalize(reply)
}

pub fn update_refuge(reply: Reply) -> UpdateRefugeResponse {
    normalize(reply)
}

pub fn delete_refuge(reply: Reply) -> DeleteRefugeResponse {
    normalize(reply)
}

pub fn post_image(reply: Reply) -> PostImageResponse {
    normalize(reply)
}

pub fn authentication(reply: Reply) -> AuthenticationResponse {
    normalize(reply)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;
    use serde_json::{Value, json};

    use super::*;
    use crate::response::{
        AuthenticationError, CreateRefugeError, DeleteRefugeError, GetAllRefugesError,
        GetRefugeError, PostImageError, UpdateRefugeError,
    };

    fn refuge_json(id: &str) -> Value {
        json!({
            "_id": id,
            "name": "Cabana Nova",
            "region": "Pirineu",
            "image": "no-photo.png",
            "altitude": 2100,
            "coordinates": { "latitude": 42.5, "longitude": 1.5 },
            "capacity": { "winter": 8, "summer": 24 }
        })
    }

    fn failure(status: u16, body: Value) -> Reply {
        Reply::Failure { status, body }
    }

    #[test]
    fn created_refuge() {
        let reply = Reply::Success(refuge_json("507f191e810c19729de860ea"));
        match create_refuge(reply) {
            CreateRefugeResponse::Created { data } => {
                assert_eq!(data.name, "Cabana Nova");
                assert_eq!(data.id.as_str(), "507f191e810c19729de860ea");
            }
            CreateRefugeResponse::Error { error } => panic!("unexpected {error:?}"),
        }
    }

    #[test]
    fn conflict_on_create() {
        let response = create_refuge(failure(409, json!({"detail": "exists"})));
        assert_eq!(
            response,
            CreateRefugeResponse::Error {
                error: CreateRefugeError::Conflict
            }
        );
    }

    #[test]
    fn malformed_success_payload_is_server_error() {
        let response = get_refuge(Reply::Success(json!({"name": "only a name"})));
        assert_eq!(
            response,
            GetRefugeResponse::Error {
                error: GetRefugeError::ServerSentMalformedData
            }
        );

        let response = get_all_refuges(Reply::Success(json!({"not": "a list"})));
        assert_eq!(
            response,
            GetAllRefugesResponse::Error {
                error: GetAllRefugesError::ServerSentMalformedData
            }
        );
    }

    #[test]
    fn validation_detail_reaches_the_caller() {
        let body = json!({"detail": [{"loc": ["body", "altitude"], "msg": "value is not a valid integer", "type": "type_error.integer"}]});
        assert_eq!(
            update_refuge(failure(422, body)),
            UpdateRefugeResponse::Error {
                error: UpdateRefugeError::ClientSentInvalidData {
                    message: "value is not a valid integer".into()
                }
            }
        );
    }

    #[test]
    fn shapeless_422_is_a_programmer_error() {
        assert_eq!(
            delete_refuge(failure(422, Value::Null)),
            DeleteRefugeResponse::Error {
                error: DeleteRefugeError::ProgrammerSentInvalidData
            }
        );
    }

    #[test]
    fn list_of_refuges() {
        let body = json!([
            refuge_json("507f191e810c19729de860ea"),
            refuge_json("507f191e810c19729de860eb")
        ]);
        let data = get_all_refuges(Reply::Success(body)).into_result().unwrap();
        assert_eq!(data.len(), 2);
    }

    #[test]
    fn uploaded_image_filename() {
        assert_eq!(
            post_image(Reply::Success(json!("3f2a.jpeg"))),
            PostImageResponse::Correct {
                data: "3f2a.jpeg".into()
            }
        );
        assert_eq!(
            post_image(failure(400, Value::Null)),
            PostImageResponse::Error {
                error: PostImageError::InvalidRequest
            }
        );
    }

    #[test]
    fn login_token() {
        let body = json!({"access_token": "abc.def", "token_type": "bearer"});
        let token = authentication(Reply::Success(body)).into_result().unwrap();
        assert_eq!(token.access_token.expose_secret(), "abc.def");

        let rejected = authentication(failure(401, Value::Null));
        assert!(matches!(
            rejected,
            AuthenticationResponse::Error {
                error: AuthenticationError::Unauthorized
            }
        ));
    }

    #[test]
    fn server_errors_are_unknown() {
        assert_eq!(
            get_all_refuges(failure(500, json!("Internal Server Error"))),
            GetAllRefugesResponse::Error {
                error: GetAllRefugesError::Unknown
            }
        );
    }
}
