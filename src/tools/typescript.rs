//! TypeScript declarations inferred from a JSON sample.
//!
//! Objects become interfaces, arrays of objects are merged into a single
//! element interface whose keys are optional when some elements lack them.

use std::{
    collections::HashSet,
    sync::{Arc, LazyLock},
};

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::{
    Result, ToolkitError,
    model::StepId,
    runtime::Context,
    tools::{Tool, ToolOutput, ToolType, json, parse_config},
};

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap());

fn default_root_name() -> String {
    "Root".to_string()
}

fn default_export() -> bool {
    true
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JsonToTypescriptTool {
    #[serde(default = "default_root_name")]
    root_name: String,
    #[serde(default = "default_export")]
    export: bool,
}

impl JsonToTypescriptTool {
    pub fn convert(
        &self,
        input: &str,
    ) -> Result<String> {
        let value = json::parse(input)?;
        Ok(Generator::new(self.export).generate(&self.root_name, &value))
    }
}

#[async_trait]
impl Tool for JsonToTypescriptTool {
    fn create(config: Option<serde_json::Value>) -> Result<Self> {
        let tool: Self = parse_config(config, &Self::schema())?;
        if !IDENTIFIER.is_match(&tool.root_name) {
            return Err(ToolkitError::Tool(format!("rootName '{}' is not a valid TypeScript identifier", tool.root_name)));
        }
        Ok(tool)
    }

    fn schema() -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "rootName": {
                    "type": "string",
                    "minLength": 1,
                    "description": "Name of the top-level interface or type"
                },
                "export": {
                    "type": "boolean",
                    "description": "Prefix declarations with 'export'"
                }
            },
            "additionalProperties": false
        })
    }

    fn tool_type(&self) -> ToolType {
        ToolType::JsonToTypescript
    }

    async fn run(
        &self,
        _: Arc<Context>,
        _: StepId,
        input: &str,
    ) -> Result<ToolOutput> {
        match self.convert(input) {
            Ok(output) => Ok(ToolOutput::success(output)),
            Err(e @ ToolkitError::InvalidJson(_)) => Ok(ToolOutput::failed(e.to_string())),
            Err(e) => Err(e),
        }
    }
}

struct Generator {
    export: bool,
    /// Declarations in emission order; a slot is reserved before children are visited.
    declarations: Vec<String>,
    names: HashSet<String>,
}

impl Generator {
    fn new(export: bool) -> Self {
        Self {
            export,
            declarations: Vec::new(),
            names: HashSet::new(),
        }
    }

    fn generate(
        mut self,
        root_name: &str,
        value: &Value,
    ) -> String {
        match value {
            Value::Object(map) => {
                self.interface(root_name, &[map]);
            }
            _ => {
                let slot = self.reserve();
                let name = self.unique_name(root_name);
                let ty = match value {
                    Value::Array(items) => {
                        let items: Vec<&Value> = items.iter().collect();
                        self.array_type(&format!("{}Item", name), &items)
                    }
                    other => primitive(other).to_string(),
                };
                self.declarations[slot] = format!("{}type {} = {};", self.prefix(), name, ty);
            }
        }
        self.declarations.join("\n\n")
    }

    fn prefix(&self) -> &'static str {
        if self.export { "export " } else { "" }
    }

    fn reserve(&mut self) -> usize {
        self.declarations.push(String::new());
        self.declarations.len() - 1
    }

    fn unique_name(
        &mut self,
        hint: &str,
    ) -> String {
        let base = pascal_case(hint);
        let mut name = base.clone();
        let mut n = 2;
        while self.names.contains(&name) {
            name = format!("{}{}", base, n);
            n += 1;
        }
        self.names.insert(name.clone());
        name
    }

    /// Emit one interface covering all `objects` and return its name.
    fn interface(
        &mut self,
        hint: &str,
        objects: &[&Map<String, Value>],
    ) -> String {
        let slot = self.reserve();
        let name = self.unique_name(hint);

        let mut keys: Vec<&String> = Vec::new();
        for object in objects {
            for key in object.keys() {
                if !keys.contains(&key) {
                    keys.push(key);
                }
            }
        }

        let mut fields = Vec::with_capacity(keys.len());
        for key in keys {
            let values: Vec<&Value> = objects.iter().filter_map(|o| o.get(key.as_str())).collect();
            let optional = values.len() < objects.len();
            let ty = self.union_type(key, &values);
            fields.push(format!("  {}{}: {};", property_name(key), if optional { "?" } else { "" }, ty));
        }

        let body = if fields.is_empty() { "{}".to_string() } else { format!("{{\n{}\n}}", fields.join("\n")) };
        self.declarations[slot] = format!("{}interface {} {}", self.prefix(), name, body);
        name
    }

    /// Type of a property seen with `values`; object values share one interface.
    fn union_type(
        &mut self,
        hint: &str,
        values: &[&Value],
    ) -> String {
        let mut types: Vec<String> = Vec::new();
        let objects: Vec<&Map<String, Value>> = values.iter().filter_map(|v| v.as_object()).collect();
        let items: Vec<&Value> = values.iter().filter_map(|v| v.as_array()).flatten().collect();
        let mut object_done = false;
        let mut array_done = false;

        for value in values {
            let ty = match value {
                Value::Object(_) => {
                    if object_done {
                        continue;
                    }
                    object_done = true;
                    self.interface(hint, &objects)
                }
                // every array seen under this key shares one element type
                Value::Array(_) => {
                    if array_done {
                        continue;
                    }
                    array_done = true;
                    self.array_type(&singular(hint), &items)
                }
                other => primitive(other).to_string(),
            };
            if !types.contains(&ty) {
                types.push(ty);
            }
        }

        types.join(" | ")
    }

    fn array_type(
        &mut self,
        hint: &str,
        items: &[&Value],
    ) -> String {
        if items.is_empty() {
            return "unknown[]".to_string();
        }
        let element = self.union_type(hint, items);
        if element.contains(" | ") { format!("({})[]", element) } else { format!("{}[]", element) }
    }
}

fn primitive(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) | Value::Object(_) => "unknown",
    }
}

fn property_name(key: &str) -> String {
    if IDENTIFIER.is_match(key) { key.to_string() } else { serde_json::Value::String(key.to_string()).to_string() }
}

fn pascal_case(hint: &str) -> String {
    let mut name: String = hint
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect();
    if name.is_empty() {
        name = "Type".to_string();
    } else if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name
}

/// Element name for an array stored under `hint`.
fn singular(hint: &str) -> String {
    if let Some(stem) = hint.strip_suffix("ies").filter(|s| !s.is_empty()) {
        format!("{}y", stem)
    } else if hint.len() > 1 && hint.ends_with('s') && !hint.ends_with("ss") {
        hint[..hint.len() - 1].to_string()
    } else {
        format!("{}Item", pascal_case(hint))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::tools::{ToolStatus, tests::run_tool};

    fn convert(input: &str) -> String {
        JsonToTypescriptTool::create(None).unwrap().convert(input).unwrap()
    }

    #[test]
    fn test_flat_object() {
        assert_eq!(convert(r#"{"a":1,"b":"x","c":true,"d":null}"#), "export interface Root {\n  a: number;\n  b: string;\n  c: boolean;\n  d: null;\n}");
    }

    #[test]
    fn test_nested_objects_parent_first() {
        let output = convert(r#"{"a":1,"b":{"c":"x"},"d":[1,2]}"#);
        assert_eq!(output, "export interface Root {\n  a: number;\n  b: B;\n  d: number[];\n}\n\nexport interface B {\n  c: string;\n}");
    }

    #[test]
    fn test_array_of_objects_merged_with_optional_keys() {
        let output = convert(r#"{"users":[{"id":1,"name":"a"},{"id":2,"email":"b@c"}]}"#);
        assert_eq!(output, "export interface Root {\n  users: User[];\n}\n\nexport interface User {\n  id: number;\n  name?: string;\n  email?: string;\n}");
    }

    #[test]
    fn test_nested_arrays_merged_across_elements() {
        let output = convert(r#"{"users":[{"tags":[{"k":1}]},{"tags":[{"v":2}]}]}"#);
        assert_eq!(
            output,
            "export interface Root {\n  users: User[];\n}\n\nexport interface User {\n  tags: Tag[];\n}\n\nexport interface Tag {\n  k?: number;\n  v?: number;\n}"
        );
    }

    #[test]
    fn test_mixed_and_empty_arrays() {
        let output = convert(r#"{"tags":["a",1],"none":[]}"#);
        assert_eq!(output, "export interface Root {\n  tags: (string | number)[];\n  none: unknown[];\n}");
    }

    #[test]
    fn test_quoted_keys_and_name_collisions() {
        let output = convert(r#"{"first-name":"a","root":{"x":1}}"#);
        assert_eq!(output, "export interface Root {\n  \"first-name\": string;\n  root: Root2;\n}\n\nexport interface Root2 {\n  x: number;\n}");
    }

    #[test]
    fn test_root_array_and_primitive() {
        assert_eq!(convert(r#"[{"id":1}]"#), "export type Root = RootItem[];\n\nexport interface RootItem {\n  id: number;\n}");
        assert_eq!(convert("42"), "export type Root = number;");
    }

    #[test]
    fn test_categories_singular() {
        let output = convert(r#"{"categories":[{"id":1}]}"#);
        assert!(output.contains("categories: Category[];"));
        assert!(output.contains("export interface Category {"));
    }

    #[test]
    fn test_config_root_name_and_export() {
        let tool = JsonToTypescriptTool::create(Some(json!({ "rootName": "Payload", "export": false }))).unwrap();
        assert_eq!(tool.convert("{}").unwrap(), "interface Payload {}");
    }

    #[test]
    fn test_invalid_root_name() {
        assert!(JsonToTypescriptTool::create(Some(json!({ "rootName": "my root" }))).is_err());
    }

    #[test]
    fn test_run_invalid_json() {
        let output = run_tool(ToolType::JsonToTypescript, None, "nope").unwrap();
        assert_eq!(output.status, ToolStatus::Failed);
    }

    #[test]
    fn test_pascal_case() {
        assert_eq!(pascal_case("user_profile"), "UserProfile");
        assert_eq!(pascal_case("2fa"), "_2fa");
        assert_eq!(pascal_case("--"), "Type");
    }
}
