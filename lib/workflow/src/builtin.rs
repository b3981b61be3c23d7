//! Built-in node type catalog.
//!
//! These descriptors are always available. A catalog fetched at startup is
//! merged on top of them, with fetched entries winning on id collision.

use crate::node_type::NodeType;
use crate::port::InputPort;
use crate::schema::{ConfigSchema, FieldSpec};

/// Returns every built-in node type, in palette order.
#[must_use]
pub fn builtin_node_types() -> Vec<NodeType> {
    vec![
        manual_trigger(),
        webhook_trigger(),
        cron_trigger(),
        http_request(),
        write_file(),
        read_file(),
        data_transform(),
        javascript_code(),
        if_condition(),
        merge(),
        set_variable(),
        wait(),
        delay(),
        email_send(),
        gmail_send(),
        gmail_read(),
        save_to_sheets(),
        read_from_sheets(),
        webhook_response(),
        chatgpt_api(),
        deepseek_api(),
    ]
}

fn manual_trigger() -> NodeType {
    NodeType::trigger("manual_trigger", "Manual Trigger")
        .with_description("Start the workflow execution manually")
        .with_appearance("#4a69bd", "fa-play-circle")
        .with_schema(
            ConfigSchema::new()
                .with_field(
                    "trigger_name",
                    FieldSpec::string()
                        .with_title("Trigger Name")
                        .with_default("Start Workflow"),
                )
                .with_field("description", FieldSpec::string().with_title("Description")),
        )
}

fn webhook_trigger() -> NodeType {
    NodeType::trigger("webhook_trigger", "Webhook Trigger")
        .with_description("Waits for incoming HTTP requests at a webhook URL")
        .with_appearance("#61affe", "fa-arrow-right")
        .with_schema(
            ConfigSchema::new()
                .with_field("path", FieldSpec::string().with_title("Webhook Path").required())
                .with_field(
                    "method",
                    FieldSpec::string()
                        .with_title("HTTP Method")
                        .with_enum(["GET", "POST", "PUT", "DELETE", "ANY"])
                        .with_default("POST")
                        .required(),
                )
                .with_field("secret", FieldSpec::string().with_title("Secret Token"))
                .with_field(
                    "timeout",
                    FieldSpec::number().with_title("Timeout (seconds)").with_default(120),
                ),
        )
}

fn cron_trigger() -> NodeType {
    NodeType::trigger("cron_trigger", "Cron Trigger")
        .with_description("Trigger workflow execution based on cron schedule")
        .with_appearance("#795548", "fa-calendar-alt")
        .with_schema(
            ConfigSchema::new()
                .with_field(
                    "cron_expression",
                    FieldSpec::string().with_title("Cron Expression").required(),
                )
                .with_field("timezone", FieldSpec::string().with_title("Timezone").with_default("UTC"))
                .with_field(
                    "max_wait",
                    FieldSpec::number().with_title("Maximum Wait (seconds)").with_default(3600),
                )
                .with_field(
                    "simulation_mode",
                    FieldSpec::boolean().with_title("Simulation Mode").with_default(true),
                ),
        )
}

fn http_request() -> NodeType {
    NodeType::new("http_request", "HTTP Request")
        .with_description("Make HTTP requests to APIs and web services")
        .with_appearance("#61affe", "fa-globe")
        .single_input()
        .with_schema(
            ConfigSchema::new()
                .with_field("url", FieldSpec::string().with_title("URL").required())
                .with_field(
                    "method",
                    FieldSpec::string()
                        .with_title("Method")
                        .with_enum(["GET", "POST", "PUT", "DELETE", "PATCH", "HEAD", "OPTIONS"])
                        .with_default("GET")
                        .required(),
                )
                .with_field("headers", FieldSpec::object().with_title("Headers"))
                .with_field("params", FieldSpec::object().with_title("Query Parameters"))
                .with_field("body", FieldSpec::string().with_title("Request Body"))
                .with_field("json", FieldSpec::object().with_title("JSON Body"))
                .with_field("auth", FieldSpec::object().with_title("Authentication")),
        )
}

fn write_file() -> NodeType {
    NodeType::new("write_file", "Write File")
        .with_description("Write data to a file on the server")
        .with_appearance("#4caf50", "fa-file")
        .single_input()
        .with_schema(
            ConfigSchema::new()
                .with_field("path", FieldSpec::string().with_title("File Path").required())
                .with_field("content", FieldSpec::string().with_title("Content").required())
                .with_field(
                    "mode",
                    FieldSpec::string()
                        .with_title("Write Mode")
                        .with_enum(["overwrite", "append"])
                        .with_default("overwrite"),
                )
                .with_field(
                    "create_directories",
                    FieldSpec::boolean().with_title("Create Directories").with_default(true),
                ),
        )
}

fn read_file() -> NodeType {
    NodeType::new("read_file", "Read File")
        .with_description("Read data from a local file")
        .with_appearance("#2196f3", "fa-file-alt")
        .single_input()
        .with_schema(
            ConfigSchema::new()
                .with_field("path", FieldSpec::string().with_title("File Path").required())
                .with_field(
                    "format",
                    FieldSpec::string()
                        .with_title("File Format")
                        .with_enum(["auto", "text", "json", "csv", "binary"])
                        .with_default("auto"),
                )
                .with_field("encoding", FieldSpec::string().with_title("Encoding").with_default("utf-8"))
                .with_field(
                    "csv_delimiter",
                    FieldSpec::string().with_title("CSV Delimiter").with_default(","),
                ),
        )
}

fn data_transform() -> NodeType {
    NodeType::new("data_transform", "Data Transform")
        .with_description("Transform, filter and manipulate data")
        .with_appearance("#ff9800", "fa-filter")
        .single_input()
        .with_schema(
            ConfigSchema::new()
                .with_field(
                    "operation",
                    FieldSpec::string()
                        .with_title("Operation")
                        .with_enum(["filter", "map", "sort", "select", "custom"])
                        .with_default("filter")
                        .required(),
                )
                .with_field("input", FieldSpec::string().with_title("Input").required())
                .with_field(
                    "filter_condition",
                    FieldSpec::string()
                        .with_title("Filter Condition")
                        .required()
                        .show_if("operation", "filter"),
                )
                .with_field(
                    "map_expression",
                    FieldSpec::string()
                        .with_title("Map Expression")
                        .required()
                        .show_if("operation", "map"),
                )
                .with_field(
                    "sort_key",
                    FieldSpec::string()
                        .with_title("Sort Key")
                        .required()
                        .show_if("operation", "sort"),
                )
                .with_field(
                    "sort_descending",
                    FieldSpec::boolean()
                        .with_title("Sort Descending")
                        .with_default(false)
                        .show_if("operation", "sort"),
                )
                .with_field(
                    "select_keys",
                    FieldSpec::array()
                        .with_title("Select Keys")
                        .required()
                        .show_if("operation", "select"),
                )
                .with_field(
                    "custom_code",
                    FieldSpec::code("javascript")
                        .with_title("Custom Code")
                        .required()
                        .show_if("operation", "custom"),
                ),
        )
}

fn javascript_code() -> NodeType {
    NodeType::new("javascript_code", "JavaScript Code")
        .with_description("Run JavaScript code")
        .with_appearance("#f48c42", "fa-code")
        .with_schema(
            ConfigSchema::new()
                .with_field("code", FieldSpec::code("javascript").with_title("Code").required())
                .with_field("input_data", FieldSpec::object().with_title("Input Data")),
        )
}

fn if_condition() -> NodeType {
    NodeType::new("if_condition", "If Condition")
        .with_description("Branch workflow based on a condition")
        .with_appearance("#9c27b0", "fa-code-branch")
        .branching()
        .with_schema(
            ConfigSchema::new()
                .with_field("condition", FieldSpec::string().with_title("Condition").required())
                .with_field("value1", FieldSpec::string().with_title("Value 1"))
                .with_field(
                    "operator",
                    FieldSpec::string()
                        .with_title("Operator")
                        .with_enum([
                            "==",
                            "!=",
                            ">",
                            "<",
                            ">=",
                            "<=",
                            "contains",
                            "startsWith",
                            "endsWith",
                            "isEmpty",
                            "isNotEmpty",
                            "matches",
                        ])
                        .with_default("=="),
                )
                .with_field("value2", FieldSpec::string().with_title("Value 2"))
                .with_field(
                    "mode",
                    FieldSpec::string()
                        .with_title("Condition Mode")
                        .with_enum(["simple", "expression"])
                        .with_default("simple"),
                ),
        )
}

fn merge() -> NodeType {
    NodeType::new("merge", "Merge")
        .with_description("Combine data from multiple inputs")
        .with_appearance("#9c27b0", "fa-object-group")
        .with_inputs(vec![InputPort::required("input")])
        .with_schema(
            ConfigSchema::new()
                .with_field(
                    "merge_mode",
                    FieldSpec::string()
                        .with_title("Merge Mode")
                        .with_enum(["combine", "append", "overwrite"])
                        .with_default("combine")
                        .required(),
                )
                .with_field(
                    "output_format",
                    FieldSpec::string()
                        .with_title("Output Format")
                        .with_enum(["object", "array", "string"])
                        .with_default("object"),
                )
                .with_field("custom_key", FieldSpec::string().with_title("Custom Key")),
        )
}

fn set_variable() -> NodeType {
    NodeType::new("set_variable", "Set Variable")
        .with_description("Define a variable to be used in the workflow")
        .with_appearance("#9c27b0", "fa-database")
        .single_input()
        .with_schema(
            ConfigSchema::new()
                .with_field("name", FieldSpec::string().with_title("Variable Name").required())
                .with_field("value", FieldSpec::string().with_title("Value").required())
                .with_field(
                    "type",
                    FieldSpec::string()
                        .with_title("Value Type")
                        .with_enum(["string", "number", "boolean", "json", "expression"])
                        .with_default("string")
                        .required(),
                )
                .with_field(
                    "scope",
                    FieldSpec::string()
                        .with_title("Variable Scope")
                        .with_enum(["workflow", "node"])
                        .with_default("workflow")
                        .required(),
                ),
        )
}

fn wait() -> NodeType {
    NodeType::new("wait", "Wait")
        .with_description("Pause workflow execution for a specified duration")
        .with_appearance("#9c27b0", "fa-hourglass-half")
        .single_input()
        .with_schema(
            ConfigSchema::new()
                .with_field("duration", FieldSpec::number().with_title("Duration").with_default(5).required())
                .with_field(
                    "unit",
                    FieldSpec::string()
                        .with_title("Time Unit")
                        .with_enum(["seconds", "minutes", "hours"])
                        .with_default("seconds")
                        .required(),
                )
                .with_field(
                    "max_wait",
                    FieldSpec::number().with_title("Maximum Wait (seconds)").with_default(3600),
                ),
        )
}

fn delay() -> NodeType {
    NodeType::new("delay", "Delay")
        .with_description("Pause workflow execution for a specified duration")
        .with_appearance("#795548", "fa-stopwatch")
        .with_schema(
            ConfigSchema::new()
                .with_field(
                    "duration",
                    FieldSpec::number().with_title("Duration (seconds)").with_default(5).required(),
                )
                .with_field(
                    "display_format",
                    FieldSpec::string()
                        .with_title("Display Format")
                        .with_enum(["seconds", "minutes", "hours"])
                        .with_default("seconds"),
                )
                .with_field(
                    "max_wait",
                    FieldSpec::number().with_title("Maximum Wait (seconds)").with_default(3600),
                ),
        )
}

fn email_send() -> NodeType {
    NodeType::new("email_send", "Send Email")
        .with_description("Send emails using SMTP")
        .with_appearance("#9c27b0", "fa-envelope")
        .single_input()
        .with_schema(
            ConfigSchema::new()
                .with_field("to", FieldSpec::string().with_title("To").required())
                .with_field("subject", FieldSpec::string().with_title("Subject").required())
                .with_field("body", FieldSpec::string().with_title("Body").required())
                .with_field("html", FieldSpec::boolean().with_title("HTML Email").with_default(false))
                .with_field("from_email", FieldSpec::string().with_title("From"))
                .with_field("smtp_server", FieldSpec::string().with_title("SMTP Server"))
                .with_field("smtp_port", FieldSpec::number().with_title("SMTP Port"))
                .with_field("username", FieldSpec::string().with_title("Username"))
                .with_field("password", FieldSpec::string().with_title("Password")),
        )
}

fn gmail_send() -> NodeType {
    NodeType::new("gmail_send", "Send Email (Gmail)")
        .with_description("Send emails using the Gmail API")
        .with_appearance("#f44336", "fab fa-google")
        .single_input()
        .with_schema(
            ConfigSchema::new()
                .with_field(
                    "google_credentials",
                    FieldSpec::string().with_title("Google Credentials").required(),
                )
                .with_field("to", FieldSpec::string().with_title("To").required())
                .with_field("subject", FieldSpec::string().with_title("Subject").required())
                .with_field("body", FieldSpec::string().with_title("Body").required())
                .with_field("cc", FieldSpec::string().with_title("CC"))
                .with_field("bcc", FieldSpec::string().with_title("BCC"))
                .with_field("html", FieldSpec::boolean().with_title("HTML Email").with_default(true)),
        )
}

fn gmail_read() -> NodeType {
    NodeType::new("gmail_read", "Read Email (Gmail)")
        .with_description("Read emails from Gmail inbox")
        .with_appearance("#f44336", "fas fa-envelope-open")
        .with_schema(
            ConfigSchema::new()
                .with_field(
                    "google_credentials",
                    FieldSpec::string().with_title("Google Credentials").required(),
                )
                .with_field("query", FieldSpec::string().with_title("Search Query").with_default("is:unread"))
                .with_field("max_results", FieldSpec::number().with_title("Maximum Results").with_default(10))
                .with_field("mark_as_read", FieldSpec::boolean().with_title("Mark as Read").with_default(false))
                .with_field(
                    "include_attachments",
                    FieldSpec::boolean().with_title("Include Attachments").with_default(false),
                ),
        )
}

fn save_to_sheets() -> NodeType {
    NodeType::new("save_to_sheets", "Save to Google Sheets")
        .with_description("Write data to a Google Sheets spreadsheet")
        .with_appearance("#4caf50", "fa-table")
        .single_input()
        .with_schema(
            ConfigSchema::new()
                .with_field(
                    "google_credentials",
                    FieldSpec::string().with_title("Google Credentials").required(),
                )
                .with_field("spreadsheet_id", FieldSpec::string().with_title("Spreadsheet ID").required())
                .with_field("sheet_name", FieldSpec::string().with_title("Sheet Name").with_default("Sheet1"))
                .with_field("data", FieldSpec::string().with_title("Data").required())
                .with_field(
                    "insert_mode",
                    FieldSpec::string()
                        .with_title("Insert Mode")
                        .with_enum(["append", "replace", "update"])
                        .with_default("append"),
                )
                .with_field(
                    "value_input_option",
                    FieldSpec::string()
                        .with_title("Value Input Option")
                        .with_enum(["RAW", "USER_ENTERED"])
                        .with_default("USER_ENTERED"),
                ),
        )
}

fn read_from_sheets() -> NodeType {
    NodeType::new("read_from_sheets", "Read from Google Sheets")
        .with_description("Read data from a Google Sheets spreadsheet")
        .with_appearance("#2196f3", "fa-table")
        .with_schema(
            ConfigSchema::new()
                .with_field(
                    "google_credentials",
                    FieldSpec::string().with_title("Google Credentials").required(),
                )
                .with_field("spreadsheet_id", FieldSpec::string().with_title("Spreadsheet ID").required())
                .with_field("range", FieldSpec::string().with_title("Range").required())
                .with_field(
                    "include_headers",
                    FieldSpec::boolean().with_title("Include Headers").with_default(true),
                )
                .with_field(
                    "output_format",
                    FieldSpec::string()
                        .with_title("Output Format")
                        .with_enum(["array", "object"])
                        .with_default("object"),
                ),
        )
}

fn webhook_response() -> NodeType {
    NodeType::new("webhook_response", "Webhook Response")
        .with_description("Send a response back to a webhook request")
        .with_appearance("#61affe", "fa-reply")
        .single_input()
        .with_schema(
            ConfigSchema::new()
                .with_field(
                    "status_code",
                    FieldSpec::number().with_title("Status Code").with_default(200).required(),
                )
                .with_field(
                    "content_type",
                    FieldSpec::string()
                        .with_title("Content Type")
                        .with_enum(["application/json", "text/plain", "text/html", "application/xml"])
                        .with_default("application/json")
                        .required(),
                )
                .with_field("body", FieldSpec::string().with_title("Response Body").required())
                .with_field("headers", FieldSpec::object().with_title("Response Headers")),
        )
}

fn chatgpt_api() -> NodeType {
    NodeType::new("chatgpt_api", "ChatGPT API")
        .with_description("Call OpenAI's ChatGPT API to generate text")
        .with_appearance("#10a37f", "fa-comment-dots")
        .with_schema(
            llm_schema(&["gpt-4o", "gpt-4-turbo", "gpt-3.5-turbo", "gpt-4-vision-preview"])
                .with_field("json_mode", FieldSpec::boolean().with_title("JSON Mode").with_default(false)),
        )
}

fn deepseek_api() -> NodeType {
    NodeType::new("deepseek_api", "DeepSeek API")
        .with_description("Call DeepSeek's AI models to generate text")
        .with_appearance("#7b68ee", "fa-robot")
        .with_schema(llm_schema(&["deepseek-chat", "deepseek-coder", "deepseek-v2"]))
}

/// Fields shared by the chat-completion node types. The first model is the default.
fn llm_schema(models: &[&str]) -> ConfigSchema {
    let mut model = FieldSpec::string()
        .with_title("Model")
        .with_enum(models.iter().copied())
        .required();
    if let Some(first) = models.first() {
        model = model.with_default(*first);
    }

    ConfigSchema::new()
        .with_field("api_key", FieldSpec::string().with_title("API Key").required())
        .with_field("model", model)
        .with_field("messages", FieldSpec::array().with_title("Messages").required())
        .with_field("system_message", FieldSpec::string().with_title("System Message"))
        .with_field("temperature", FieldSpec::number().with_title("Temperature").with_default(0.7))
        .with_field("max_tokens", FieldSpec::number().with_title("Max Tokens").with_default(1000))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn builtin_ids_are_unique() {
        let types = builtin_node_types();
        let ids: HashSet<&str> = types.iter().map(|node_type| node_type.id.as_str()).collect();
        assert_eq!(ids.len(), types.len());
    }

    #[test]
    fn triggers_are_the_only_start_types() {
        let starts: Vec<String> = builtin_node_types()
            .into_iter()
            .filter(NodeType::is_start_role)
            .map(|node_type| node_type.id.into_inner())
            .collect();
        assert_eq!(starts, vec!["manual_trigger", "webhook_trigger", "cron_trigger"]);
    }

    #[test]
    fn single_input_types_match_catalog() {
        let single: HashSet<String> = builtin_node_types()
            .into_iter()
            .filter(|node_type| node_type.is_single_input("input"))
            .map(|node_type| node_type.id.into_inner())
            .collect();
        for expected in [
            "http_request",
            "write_file",
            "read_file",
            "email_send",
            "gmail_send",
            "save_to_sheets",
            "webhook_response",
            "set_variable",
            "wait",
            "data_transform",
        ] {
            assert!(single.contains(expected), "{expected} should be single-input");
        }
        assert!(!single.contains("merge"));
    }

    #[test]
    fn if_condition_branches() {
        let types = builtin_node_types();
        let node_type = types
            .iter()
            .find(|node_type| node_type.id == "if_condition")
            .expect("if_condition registered");
        assert!(node_type.is_branching());
    }

    #[test]
    fn llm_model_defaults_to_first() {
        let schema = llm_schema(&["a", "b"]);
        let model = schema.get("model").expect("model field");
        assert_eq!(model.default, Some(serde_json::json!("a")));
    }
}
