use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::rest::error::ApiError;
use crate::tasks::{validate, Task, TaskPayload};
use crate::AppContext;

pub async fn list_tasks(State(ctx): State<Arc<AppContext>>) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = ctx.tasks.get_all_tasks().await?;
    Ok(Json(tasks))
}

pub async fn get_task(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<i64>,
) -> Result<Json<Task>, ApiError> {
    match ctx.tasks.get_task_by_id(id).await? {
        Some(task) => Ok(Json(task)),
        None => Err(ApiError::NotFound(id)),
    }
}

pub async fn create_task(
    State(ctx): State<Arc<AppContext>>,
    Json(payload): Json<TaskPayload>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let valid = validate(&payload).map_err(ApiError::Validation)?;
    let created = ctx.tasks.create_task(valid).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_task(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<i64>,
    Json(payload): Json<TaskPayload>,
) -> Result<Json<Task>, ApiError> {
    let valid = validate(&payload).map_err(ApiError::Validation)?;

    if ctx.tasks.get_task_by_id(id).await?.is_none() {
        return Err(ApiError::NotFound(id));
    }

    // The existence check and the write are separate statements; a
    // concurrent delete landing between them leaves zero rows affected,
    // which surfaces here as a 500.
    let updated = ctx.tasks.update_task(id, valid.clone()).await?;
    if !updated {
        return Err(ApiError::Internal(anyhow::anyhow!(
            "update affected zero rows for existing task {id}"
        )));
    }

    Ok(Json(Task {
        id: Some(id),
        title: valid.title,
        description: valid.description,
        completed: valid.completed,
    }))
}

pub async fn delete_task(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if ctx.tasks.delete_task(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(id))
    }
}
