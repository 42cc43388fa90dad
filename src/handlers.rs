/// HTTP request handlers: the GraphQL endpoint, GraphiQL, and the health
/// check over the two backing stores.
use actix_web::{web, HttpRequest, HttpResponse};
use async_graphql::http::GraphiQLSource;
use async_graphql_actix_web::{GraphQLRequest, GraphQLResponse};
use redis::aio::ConnectionManager;
use sqlx::PgPool;

use crate::error::AppError;
use crate::graphql::AppSchema;
use crate::session::{Identity, SessionStore};

/// Resolve the session cookie to an identity. A missing or stale cookie is
/// an anonymous caller; a session store failure fails the whole request.
async fn resolve_identity(
    req: &HttpRequest,
    sessions: &SessionStore,
) -> Result<Identity, AppError> {
    let Some(cookie) = req.cookie(sessions.cookie_name()) else {
        return Ok(Identity::anonymous());
    };

    let token = cookie.value().to_string();
    match sessions.user_id(&token).await? {
        Some(user_id) => Ok(Identity::authenticated(user_id, token)),
        None => Ok(Identity::anonymous()),
    }
}

/// GraphQL endpoint; the caller's identity is attached to the execution
pub async fn graphql(
    schema: web::Data<AppSchema>,
    sessions: web::Data<SessionStore>,
    http_req: HttpRequest,
    gql_req: GraphQLRequest,
) -> Result<GraphQLResponse, AppError> {
    let identity = resolve_identity(&http_req, &sessions).await?;

    Ok(schema
        .execute(gql_req.into_inner().data(identity))
        .await
        .into())
}

/// GraphiQL IDE, served outside production
pub async fn graphiql() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(GraphiQLSource::build().endpoint("/graphql").finish())
}

/// Shared state for the health check
pub struct HealthState {
    db_pool: PgPool,
    redis: ConnectionManager,
}

impl HealthState {
    pub fn new(db_pool: PgPool, redis: ConnectionManager) -> Self {
        Self { db_pool, redis }
    }

    async fn check_postgres(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.db_pool)
            .await
            .map(|_| ())
    }

    async fn check_redis(&self) -> Result<(), redis::RedisError> {
        let mut conn = self.redis.clone();
        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        if pong == "PONG" {
            Ok(())
        } else {
            Err(redis::RedisError::from((
                redis::ErrorKind::ResponseError,
                "unexpected PING response",
            )))
        }
    }
}

pub async fn health(state: web::Data<HealthState>) -> HttpResponse {
    if let Err(e) = state.check_postgres().await {
        return HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "unhealthy",
            "error": format!("PostgreSQL connection failed: {}", e),
            "service": "linkboard"
        }));
    }

    if let Err(e) = state.check_redis().await {
        return HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "unhealthy",
            "error": format!("Redis ping failed: {}", e),
            "service": "linkboard"
        }));
    }

    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": "linkboard",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
