//! Notes handlers
//!
//! Placeholders: no storage behind them yet, every call succeeds with a fixed
//! message.

use hyper::StatusCode;

use crate::http::{ApiResponse, ResponseHeaders};

const NOTES_ITEM_PREFIX: &str = "/notes/";

/// Everything after the last `/notes/` in the path, undecoded and possibly empty
pub fn extract_note_id(path: &str) -> &str {
    path.rsplit(NOTES_ITEM_PREFIX).next().unwrap_or(path)
}

pub fn list_notes(headers: &ResponseHeaders) -> ApiResponse {
    ApiResponse::message(StatusCode::OK, "ノート一覧取得 (仮)", headers)
}

pub fn create_note(headers: &ResponseHeaders) -> ApiResponse {
    ApiResponse::message(StatusCode::CREATED, "ノート新規作成 (仮)", headers)
}

pub fn get_note(note_id: &str, headers: &ResponseHeaders) -> ApiResponse {
    ApiResponse::message(StatusCode::OK, &format!("ノート取得（仮）: {note_id}"), headers)
}

pub fn update_note(note_id: &str, headers: &ResponseHeaders) -> ApiResponse {
    ApiResponse::message(StatusCode::OK, &format!("ノート更新（仮）: {note_id}"), headers)
}

pub fn delete_note(note_id: &str, headers: &ResponseHeaders) -> ApiResponse {
    ApiResponse::message(StatusCode::OK, &format!("ノート削除（仮）: {note_id}"), headers)
}
