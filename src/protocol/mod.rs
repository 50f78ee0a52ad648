use std::path::PathBuf;

use serde_json::{json, Value};

use crate::error::{CoreError, Result};
use crate::model::pair::Dictionary;
use crate::model::separator::SeparatorKind;
use crate::services::encoding;
use crate::services::export::{suggested_file_name, EXPORT_MIME};
use crate::session::Session;

mod command;
use command::Command;

fn get_cmd(req: &Value) -> &str {
    req.get("cmd").and_then(|v| v.as_str()).unwrap_or("")
}

fn get_id(req: &Value) -> Value {
    req.get("id").cloned().unwrap_or(Value::Null)
}

fn get_payload(req: &Value) -> &Value {
    static EMPTY: Value = Value::Null;
    req.get("payload").unwrap_or(&EMPTY)
}

fn get_str<'a>(payload: &'a Value, key: &str) -> &'a str {
    payload.get(key).and_then(|v| v.as_str()).unwrap_or("")
}

fn require_str<'a>(payload: &'a Value, key: &str) -> Result<&'a str> {
    let s = get_str(payload, key);
    if s.is_empty() {
        return Err(CoreError::InvalidPayload(format!("payload.{key} is required")));
    }
    Ok(s)
}

/// Like [`require_str`] but an explicit empty string is a valid value.
fn require_string<'a>(payload: &'a Value, key: &str) -> Result<&'a str> {
    payload
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| CoreError::InvalidPayload(format!("payload.{key} must be a string")))
}

fn get_kind(payload: &Value) -> Result<SeparatorKind> {
    let v = payload
        .get("kind")
        .cloned()
        .ok_or_else(|| CoreError::InvalidPayload("payload.kind is required".into()))?;
    serde_json::from_value(v)
        .map_err(|_| CoreError::InvalidPayload("payload.kind must be \"field\" or \"record\"".into()))
}

fn ok(id: Value, payload: Value) -> String {
    json!({
        "id": id,
        "status": "ok",
        "payload": payload
    })
    .to_string()
}

fn err(id: Value, message: impl Into<String>) -> String {
    json!({
        "id": id,
        "status": "error",
        "message": message.into()
    })
    .to_string()
}

fn view(session: &Session) -> Result<Value> {
    Ok(serde_json::to_value(session.view())?)
}

pub fn handle(session: &mut Session, input: &str) -> String {
    let req: Value = match serde_json::from_str(input) {
        Ok(v) => v,
        Err(e) => {
            tracing::debug!("rejected request: {e}");
            return json!({
                "status": "error",
                "message": "invalid json"
            })
            .to_string();
        }
    };

    let id = get_id(&req);
    let cmd_str = get_cmd(&req);
    let payload = get_payload(&req);

    let cmd = Command::from(cmd_str);
    tracing::debug!(?cmd, cmd_str, "handling request");

    match dispatch(session, cmd, payload) {
        Ok(Some(result)) => ok(id, result),
        Ok(None) => err(id, "unknown command"),
        Err(e) => {
            tracing::warn!(cmd_str, "request failed: {e}");
            err(id, e.to_string())
        }
    }
}

fn dispatch(session: &mut Session, cmd: Command, payload: &Value) -> Result<Option<Value>> {
    let result = match cmd {
        Command::Ping => json!({ "message": "movapp-core alive" }),

        Command::DetectEncoding => {
            let path = PathBuf::from(require_str(payload, "path")?);
            serde_json::to_value(encoding::detect_from_file(&path)?)?
        }

        Command::LoadTranslations => {
            let dictionary: Dictionary = serde_json::from_value(payload.clone())
                .map_err(|e| CoreError::InvalidPayload(format!("invalid translations: {e}")))?;
            session.load(dictionary);
            json!({
                "category": session.dictionary().category,
                "count": session.dictionary().translations.len(),
                "view": view(session)?,
            })
        }

        Command::LoadTranslationsFile => {
            let path = PathBuf::from(require_str(payload, "path")?);
            let category = Some(get_str(payload, "category")).filter(|c| !c.is_empty());
            let encoding = session.load_file(&path, category)?;
            json!({
                "category": session.dictionary().category,
                "count": session.dictionary().translations.len(),
                "encoding": encoding,
                "view": view(session)?,
            })
        }

        Command::ExportOpen => {
            session.open();
            view(session)?
        }

        Command::ExportClose => {
            session.close();
            view(session)?
        }

        Command::ExportSelectSeparator => {
            let kind = get_kind(payload)?;
            let id = require_str(payload, "id")?;
            session.select_separator(kind, id)?;
            view(session)?
        }

        Command::ExportSetCustomSeparator => {
            let kind = get_kind(payload)?;
            let text = require_string(payload, "text")?;
            session.set_custom_separator(kind, text);
            view(session)?
        }

        Command::ExportView => view(session)?,

        Command::ExportText => json!({
            "text": session.export_text(),
            "file_name": suggested_file_name(&session.dictionary().category),
            "mime": EXPORT_MIME,
        }),

        Command::ExportDownload => {
            let link = session.download()?;
            json!({
                "link": link,
                "view": view(session)?,
            })
        }

        Command::ExportSave => {
            let dir = PathBuf::from(require_str(payload, "dir")?);
            let path = session.save(&dir)?;
            json!({
                "path": path.to_string_lossy(),
                "bytes": session.export_text().len(),
            })
        }

        Command::Unknown => return Ok(None),
    };

    Ok(Some(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn session(staging: &std::path::Path) -> Session {
        let mut config = AppConfig::default();
        config.export.staging_dir = staging.to_path_buf();
        Session::new(&config)
    }

    fn call(session: &mut Session, req: Value) -> Value {
        serde_json::from_str(&handle(session, &req.to_string())).unwrap()
    }

    #[test]
    fn invalid_json_and_unknown_command() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session(dir.path());

        let resp: Value = serde_json::from_str(&handle(&mut s, "{oops")).unwrap();
        assert_eq!(resp["message"], "invalid json");

        let resp = call(&mut s, json!({ "id": 7, "cmd": "nope" }));
        assert_eq!(resp["id"], 7);
        assert_eq!(resp["status"], "error");
        assert_eq!(resp["message"], "unknown command");
    }

    #[test]
    fn load_then_export_text() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session(dir.path());

        let resp = call(
            &mut s,
            json!({
                "id": 1,
                "cmd": "translations.load",
                "payload": {
                    "category": "Pozdravy",
                    "translations": [{ "cz_translation": "ahoj", "ua_translation": "привіт" }]
                }
            }),
        );
        assert_eq!(resp["status"], "ok");
        assert_eq!(resp["payload"]["count"], 1);
        assert_eq!(resp["payload"]["view"]["preview"][0], "ahoj, привіт\n");

        let resp = call(&mut s, json!({ "id": 2, "cmd": "export.text" }));
        assert_eq!(resp["payload"]["text"], "ahoj, привіт\n");
        assert_eq!(resp["payload"]["file_name"], "Pozdravy.txt");
        assert_eq!(resp["payload"]["mime"], "text/plain");
    }

    #[test]
    fn empty_session_exports_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session(dir.path());

        let resp = call(&mut s, json!({ "cmd": "export.view" }));
        assert_eq!(resp["payload"]["preview"], json!([]));
        assert_eq!(resp["payload"]["file_name"], "phrases.txt");

        let resp = call(&mut s, json!({ "cmd": "export.text" }));
        assert_eq!(resp["payload"]["text"], "");
    }

    #[test]
    fn separator_commands_update_view() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session(dir.path());
        call(
            &mut s,
            json!({ "cmd": "translations.load", "payload": {
                "translations": [{ "source": "a", "target": "b" }]
            }}),
        );

        let resp = call(
            &mut s,
            json!({ "cmd": "export.select_separator", "payload": { "kind": "field", "id": "custom" } }),
        );
        assert_eq!(resp["payload"]["field"]["custom"]["visible"], true);
        assert_eq!(resp["payload"]["preview"][0], "a b\n");

        let long = "-".repeat(80);
        let resp = call(
            &mut s,
            json!({ "cmd": "export.set_custom_separator", "payload": { "kind": "field", "text": long } }),
        );
        assert_eq!(resp["payload"]["field"]["custom"]["value"], "-".repeat(50));

        let resp = call(
            &mut s,
            json!({ "cmd": "export.select_separator", "payload": { "kind": "record", "id": "tab" } }),
        );
        assert_eq!(resp["status"], "error");
        assert_eq!(resp["message"], "unknown record separator: tab");

        let resp = call(
            &mut s,
            json!({ "cmd": "export.select_separator", "payload": { "kind": "both", "id": "comma" } }),
        );
        assert_eq!(resp["status"], "error");
    }

    #[test]
    fn custom_separator_text_must_be_a_string() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session(dir.path());
        call(
            &mut s,
            json!({ "cmd": "export.set_custom_separator", "payload": { "kind": "field", "text": " | " } }),
        );

        for payload in [json!({ "kind": "field" }), json!({ "kind": "field", "text": 42 })] {
            let resp = call(&mut s, json!({ "cmd": "export.set_custom_separator", "payload": payload }));
            assert_eq!(resp["status"], "error");
            assert_eq!(resp["message"], "payload.text must be a string");
        }
        let resp = call(&mut s, json!({ "cmd": "export.view" }));
        assert_eq!(resp["payload"]["field"]["custom"]["value"], " | ");

        let resp = call(
            &mut s,
            json!({ "cmd": "export.set_custom_separator", "payload": { "kind": "field", "text": "" } }),
        );
        assert_eq!(resp["status"], "ok");
        assert_eq!(resp["payload"]["field"]["custom"]["value"], "");
    }

    #[test]
    fn loading_translations_revokes_the_staged_download() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session(dir.path());
        call(
            &mut s,
            json!({ "cmd": "translations.load", "payload": {
                "category": "Dny",
                "translations": [{ "source": "pondělí", "target": "понеділок" }]
            }}),
        );

        let resp = call(&mut s, json!({ "cmd": "export.download" }));
        let staged = PathBuf::from(resp["payload"]["link"]["path"].as_str().unwrap());
        assert!(staged.exists());

        let resp = call(
            &mut s,
            json!({ "cmd": "translations.load", "payload": {
                "category": "Měsíce",
                "translations": [{ "source": "leden", "target": "січень" }]
            }}),
        );
        assert_eq!(resp["status"], "ok");
        assert!(resp["payload"]["view"]["download"].is_null());
        assert!(!staged.exists());
    }

    #[test]
    fn missing_dictionary_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        let mut s = session(dir.path());

        let resp = call(
            &mut s,
            json!({ "cmd": "translations.load_file", "payload": { "path": missing.to_string_lossy() } }),
        );
        assert_eq!(resp["status"], "error");
        assert_eq!(
            resp["message"],
            format!("dictionary not found: {}", missing.display())
        );
    }

    #[test]
    fn download_and_close_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session(dir.path());
        call(
            &mut s,
            json!({ "cmd": "translations.load", "payload": {
                "category": "Jídlo",
                "translations": [{ "source": "chléb", "target": "хліб" }]
            }}),
        );
        call(&mut s, json!({ "cmd": "export.open" }));

        let resp = call(&mut s, json!({ "cmd": "export.download" }));
        assert_eq!(resp["status"], "ok");
        let link = &resp["payload"]["link"];
        assert_eq!(link["file_name"], "Jídlo.txt");
        let staged = PathBuf::from(link["path"].as_str().unwrap());
        assert_eq!(std::fs::read_to_string(&staged).unwrap(), "chléb, хліб\n");
        assert_eq!(resp["payload"]["view"]["download"]["url"], link["url"]);

        let resp = call(&mut s, json!({ "cmd": "export.close" }));
        assert_eq!(resp["payload"]["is_open"], false);
        assert!(resp["payload"]["download"].is_null());
        assert!(!staged.exists());
    }

    #[test]
    fn save_writes_category_file() {
        let staging = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let mut s = session(staging.path());
        call(
            &mut s,
            json!({ "cmd": "translations.load", "payload": {
                "category": "Barvy",
                "translations": [{ "source": "modrá", "target": "синій" }]
            }}),
        );

        let resp = call(
            &mut s,
            json!({ "cmd": "export.save", "payload": { "dir": out.path().to_string_lossy() } }),
        );
        assert_eq!(resp["status"], "ok");
        assert_eq!(
            std::fs::read_to_string(out.path().join("Barvy.txt")).unwrap(),
            "modrá, синій\n"
        );

        let resp = call(&mut s, json!({ "cmd": "export.save", "payload": {} }));
        assert_eq!(resp["message"], "payload.dir is required");
    }

    #[test]
    fn load_file_reports_encoding() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zvirata.json");
        std::fs::write(&path, r#"[{"source":"pes","target":"собака"}]"#).unwrap();
        let mut s = session(dir.path());

        let resp = call(
            &mut s,
            json!({ "cmd": "translations.load_file", "payload": { "path": path.to_string_lossy() } }),
        );
        assert_eq!(resp["payload"]["category"], "zvirata");
        assert_eq!(resp["payload"]["encoding"], "utf-8");
        assert_eq!(resp["payload"]["view"]["file_name"], "zvirata.txt");
    }
}
