use poem::Error as PoemError;
use poem_openapi::{
    error::{ParseParamError, ParseRequestPayloadError},
    payload::Json,
    types::{ParseFromJSON, ToJSON},
    {ApiResponse, Object, Tags},
};
use std::env;

#[derive(Tags)]
pub enum ApiTags {
    /// Health check endpoints
    HealthCheck,
    /// URL metadata resolution
    Resolver,
}

pub fn get_port() -> String {
    let port = env::var("PORT").unwrap_or("3000".to_string());
    return port;
}

pub fn get_host() -> String {
    let host = env::var("HOST").unwrap_or(format!("http://localhost:{}", get_port()));
    return host;
}

#[derive(Object)]
pub struct ResponseObject<T: ParseFromJSON + ToJSON + Send + Sync> {
    data: Option<T>,
    error: Option<String>,
}

impl<T: ParseFromJSON + ToJSON + Send + Sync> ResponseObject<T> {
    pub fn ok(data: T) -> JsonSuccess<T> {
        JsonSuccess::Ok(Json(ResponseObject {
            data: Some(data),
            error: None,
        }))
    }

    pub fn bad_request(error: impl ToString) -> JsonError<T> {
        JsonError::BadRequest(Json(ResponseObject {
            data: None,
            error: Some(error.to_string()),
        }))
    }

    pub fn internal_server_error(error: impl ToString) -> JsonError<T> {
        JsonError::InternalServerError(Json(ResponseObject {
            data: None,
            error: Some(error.to_string()),
        }))
    }
}

#[derive(ApiResponse)]
pub enum JsonSuccess<T: ParseFromJSON + ToJSON + Send + Sync> {
    #[oai(status = 200)]
    Ok(Json<ResponseObject<T>>),
}

#[derive(ApiResponse)]
#[oai(bad_request_handler = "bad_request_handler")]
pub enum JsonError<T: ParseFromJSON + ToJSON + Send + Sync> {
    #[oai(status = 400)]
    BadRequest(Json<ResponseObject<T>>),
    #[oai(status = 500)]
    InternalServerError(Json<ResponseObject<T>>),
}

fn bad_request_handler<T: ParseFromJSON + ToJSON + Send + Sync>(err: PoemError) -> JsonError<T> {
    if err.is::<ParseRequestPayloadError>()
        || err.is::<ParseParamError>()
        || err.status().is_client_error()
    {
        ResponseObject::bad_request(err)
    } else {
        ResponseObject::internal_server_error(err)
    }
}
