//! PHP source rendering for the Saloon HTTP client.

use crate::definition::{
    Capability, ClassDefinition, ClassKind, Expr, MethodDefinition, ParameterDefinition, Part,
    PropertyDefinition, RuntimeType, Stmt, TypeRef, Visibility,
};
use crate::emit::Emitter;
use crate::types::SimpleType;

use log::trace;
use serde_json::Value;

const INDENT: &str = "    ";

/// Fully-qualified names of the runtime classes generated code builds on.
#[derive(Debug, Clone)]
pub struct PhpRuntime {
    pub connector: String,
    pub http_method: String,
    pub http_response: String,
    pub request: String,
    pub has_body: String,
    pub has_json_body: String,
    pub with_response: String,
    pub has_response: String,
    pub deserializable: String,
    pub deserializes: String,
    pub base_response: String,
    pub exception: String,
}

impl Default for PhpRuntime {
    fn default() -> Self {
        Self {
            connector: "Saloon\\Http\\Connector".into(),
            http_method: "Saloon\\Enums\\Method".into(),
            http_response: "Saloon\\Http\\Response".into(),
            request: "Saloon\\Http\\Request".into(),
            has_body: "Saloon\\Contracts\\Body\\HasBody".into(),
            has_json_body: "Saloon\\Traits\\Body\\HasJsonBody".into(),
            with_response: "Saloon\\Contracts\\DataObjects\\WithResponse".into(),
            has_response: "Saloon\\Traits\\Responses\\HasResponse".into(),
            deserializable: "SdkGen\\Runtime\\Contracts\\Deserializable".into(),
            deserializes: "SdkGen\\Runtime\\Traits\\Deserializes".into(),
            base_response: "SdkGen\\Runtime\\BaseResponse".into(),
            exception: "Exception".into(),
        }
    }
}

impl PhpRuntime {
    fn runtime_class(&self, ty: RuntimeType) -> &str {
        match ty {
            RuntimeType::Connector => self.connector.as_str(),
            RuntimeType::HttpMethod => self.http_method.as_str(),
            RuntimeType::HttpResponse => self.http_response.as_str(),
        }
    }

    fn parent(&self, kind: ClassKind) -> Option<&str> {
        match kind {
            ClassKind::Response => Some(self.base_response.as_str()),
            ClassKind::Request => Some(self.request.as_str()),
            ClassKind::Dto | ClassKind::BaseResource => None,
        }
    }

    /// Interface and trait implementing a capability.
    fn capability(&self, capability: Capability) -> (Option<&str>, Option<&str>) {
        match capability {
            Capability::Deserializable => (
                Some(self.deserializable.as_str()),
                Some(self.deserializes.as_str()),
            ),
            Capability::WithResponse => (
                Some(self.with_response.as_str()),
                Some(self.has_response.as_str()),
            ),
            Capability::HasBody => (Some(self.has_body.as_str()), None),
            Capability::JsonBody => (None, Some(self.has_json_body.as_str())),
        }
    }
}

#[derive(Default)]
pub struct PhpEmitter {
    runtime: PhpRuntime,
}

impl Emitter for PhpEmitter {
    fn emit(
        &mut self,
        class: &ClassDefinition,
        writer: &mut dyn std::io::Write,
    ) -> std::io::Result<()> {
        trace!("emitting `{}`", class.fqn());
        writeln!(writer, "<?php\n")?;
        writeln!(writer, "declare(strict_types=1);\n")?;
        writeln!(writer, "namespace {};\n", class.namespace)?;
        write!(writer, "{}", doc_comment(&class.comment, ""))?;
        self.print_class_header(class, writer)?;
        writeln!(writer, "{{")?;

        let mut sections: Vec<String> = vec![];
        let traits = self.traits(class);
        if !traits.is_empty() {
            sections.push(
                traits
                    .iter()
                    .map(|t| format!("{INDENT}use \\{t};"))
                    .collect::<Vec<_>>()
                    .join("\n"),
            );
        }
        for property in &class.properties {
            sections.push(self.property(property));
        }
        if let Some(parameters) = &class.constructor {
            sections.push(self.constructor(parameters));
        }
        for method in &class.methods {
            sections.push(self.method(method));
        }
        writeln!(writer, "{}", sections.join("\n\n"))?;
        writeln!(writer, "}}")
    }
}

impl PhpEmitter {
    pub fn new(runtime: PhpRuntime) -> Self {
        Self { runtime }
    }

    pub fn render(&mut self, class: &ClassDefinition) -> std::io::Result<String> {
        let mut buf = Vec::new();
        self.emit(class, &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    fn print_class_header(
        &self,
        class: &ClassDefinition,
        writer: &mut dyn std::io::Write,
    ) -> std::io::Result<()> {
        let mut header = String::new();
        if class.is_final {
            header.push_str("final ");
        }
        header.push_str("class ");
        header.push_str(&class.name);
        if let Some(parent) = self.runtime.parent(class.kind) {
            header.push_str(&format!(" extends \\{parent}"));
        }
        let interfaces = self.interfaces(class);
        if !interfaces.is_empty() {
            let interfaces: Vec<_> = interfaces.iter().map(|i| format!("\\{i}")).collect();
            header.push_str(&format!(" implements {}", interfaces.join(", ")));
        }
        writeln!(writer, "{header}")
    }

    /// The base response already carries the response capabilities.
    fn rendered_capabilities<'c>(
        &self,
        class: &'c ClassDefinition,
    ) -> impl Iterator<Item = Capability> + 'c {
        let inherited = class.kind == ClassKind::Response;
        class.capabilities.iter().copied().filter(move |capability| {
            !(inherited
                && matches!(
                    capability,
                    Capability::Deserializable | Capability::WithResponse
                ))
        })
    }

    fn interfaces(&self, class: &ClassDefinition) -> Vec<&str> {
        self.rendered_capabilities(class)
            .filter_map(|capability| self.runtime.capability(capability).0)
            .collect()
    }

    fn traits(&self, class: &ClassDefinition) -> Vec<&str> {
        self.rendered_capabilities(class)
            .filter_map(|capability| self.runtime.capability(capability).1)
            .collect()
    }

    fn type_name(&self, ty: &TypeRef) -> String {
        match ty {
            TypeRef::Simple(simple) => match simple {
                SimpleType::String | SimpleType::Date | SimpleType::DateTime => "string",
                SimpleType::Integer => "int",
                SimpleType::Number => "float",
                SimpleType::Boolean => "bool",
                SimpleType::Array => "array",
                SimpleType::Null => "mixed",
            }
            .to_string(),
            TypeRef::Class(fqn) => format!("\\{fqn}"),
            TypeRef::List(_) => "array".into(),
            TypeRef::Union(types) => types
                .iter()
                .map(|ty| self.type_name(ty))
                .collect::<Vec<_>>()
                .join("|"),
            TypeRef::Runtime(runtime) => format!("\\{}", self.runtime.runtime_class(*runtime)),
        }
    }

    fn declared_type(&self, ty: &TypeRef, nullable: bool) -> String {
        let name = self.type_name(ty);
        if nullable && name != "mixed" && !matches!(ty, TypeRef::Union(_)) {
            format!("?{name}")
        } else {
            name
        }
    }

    fn visibility(visibility: Visibility) -> &'static str {
        match visibility {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Private => "private",
        }
    }

    fn parameter(&self, parameter: &ParameterDefinition) -> String {
        let mut out = String::new();
        if let Some(visibility) = parameter.promoted {
            out.push_str(Self::visibility(visibility));
            out.push(' ');
            if parameter.read_only {
                out.push_str("readonly ");
            }
        }
        out.push_str(&self.declared_type(&parameter.ty, parameter.nullable));
        out.push_str(&format!(" ${}", parameter.name));
        if let Some(default) = &parameter.default {
            out.push_str(&format!(" = {}", self.expr(default, "")));
        }
        out
    }

    fn property(&self, property: &PropertyDefinition) -> String {
        let mut out = format!("{INDENT}{}", Self::visibility(property.visibility));
        if property.is_static {
            out.push_str(" static");
        }
        out.push_str(&format!(
            " {} ${}",
            self.type_name(&property.ty),
            property.name
        ));
        if let Some(value) = &property.value {
            out.push_str(&format!(" = {}", self.expr(value, INDENT)));
        }
        out.push(';');
        out
    }

    fn constructor(&self, parameters: &[ParameterDefinition]) -> String {
        let mut out = String::new();
        let docs: Vec<_> = parameters
            .iter()
            .filter_map(|p| {
                let ty = p.doc_type.as_deref()?;
                let line = match &p.description {
                    Some(description) => format!("@param {ty} ${} {description}", p.name),
                    None => format!("@param {ty} ${}", p.name),
                };
                Some(line)
            })
            .collect();
        out.push_str(&doc_comment(&docs, INDENT));
        if parameters.is_empty() {
            out.push_str(&format!("{INDENT}public function __construct()\n{INDENT}{{\n{INDENT}}}"));
            return out;
        }
        out.push_str(&format!("{INDENT}public function __construct(\n"));
        for parameter in parameters {
            out.push_str(&format!("{INDENT}{INDENT}{},\n", self.parameter(parameter)));
        }
        out.push_str(&format!("{INDENT}) {{\n{INDENT}}}"));
        out
    }

    fn method(&self, method: &MethodDefinition) -> String {
        let parameters: Vec<_> = method.parameters.iter().map(|p| self.parameter(p)).collect();
        let mut out = format!(
            "{INDENT}{} function {}({})",
            Self::visibility(method.visibility),
            method.name,
            parameters.join(", ")
        );
        if let Some(ty) = &method.return_type {
            out.push_str(&format!(": {}", self.type_name(ty)));
        }
        out.push_str(&format!("\n{INDENT}{{\n"));
        let body_indent = format!("{INDENT}{INDENT}");
        for stmt in &method.body {
            out.push_str(&self.stmt(stmt, &body_indent));
            out.push('\n');
        }
        out.push_str(&format!("{INDENT}}}"));
        out
    }

    fn stmt(&self, stmt: &Stmt, indent: &str) -> String {
        match stmt {
            Stmt::Assign { variable, value } => {
                format!("{indent}${variable} = {};", self.expr(value, indent))
            }
            Stmt::Return { value } => format!("{indent}return {};", self.expr(value, indent)),
        }
    }

    fn args(&self, args: &[Expr], indent: &str) -> String {
        args.iter()
            .map(|arg| self.expr(arg, indent))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `indent` is the indentation of the line the expression starts on.
    fn expr(&self, expr: &Expr, indent: &str) -> String {
        match expr {
            Expr::Null => "null".into(),
            Expr::Literal(value) => literal(value),
            Expr::Variable(name) => format!("${name}"),
            Expr::Property(name) => format!("$this->{name}"),
            Expr::ClassRef(ty) => format!("{}::class", self.type_name(ty)),
            Expr::EnumCase { ty, case } => format!("{}::{case}", self.type_name(ty)),
            Expr::Interpolate(parts) => {
                let mut out = String::from("\"");
                for part in parts {
                    match part {
                        Part::Text(text) => out.push_str(&escape_double_quoted(text)),
                        Part::Expr(expr) => out.push_str(&format!("{{{}}}", self.expr(expr, indent))),
                    }
                }
                out.push('"');
                out
            }
            Expr::Map(entries) => {
                let entries: Vec<_> = entries
                    .iter()
                    .map(|(key, value)| {
                        format!("{} => {}", quote(key), self.expr(value, indent))
                    })
                    .collect();
                format!("[{}]", entries.join(", "))
            }
            Expr::FilterNulls(inner) => format!(
                "array_filter({}, fn ($value) => $value !== null)",
                self.expr(inner, indent)
            ),
            Expr::Call {
                target,
                method,
                args,
            } => format!(
                "{}->{method}({})",
                self.expr(target, indent),
                self.args(args, indent)
            ),
            Expr::StaticCall {
                class,
                method,
                args,
            } => format!(
                "{}::{method}({})",
                self.expr(class, indent),
                self.args(args, indent)
            ),
            Expr::Match {
                subject,
                arms,
                fallback,
            } => {
                let inner = format!("{indent}{INDENT}");
                let mut out = format!("match ({}) {{\n", self.expr(subject, indent));
                for arm in arms {
                    out.push_str(&format!(
                        "{inner}{} => {},\n",
                        self.args(&arm.patterns, &inner),
                        self.expr(&arm.value, &inner)
                    ));
                }
                out.push_str(&format!(
                    "{inner}default => {},\n{indent}}}",
                    self.expr(fallback, &inner)
                ));
                out
            }
            Expr::Throw(message) => format!(
                "throw new \\{}({})",
                self.runtime.exception,
                self.expr(message, indent)
            ),
        }
    }
}

/// A `/** ... */` block, or nothing for no lines.
fn doc_comment(lines: &[String], indentation: &str) -> String {
    if lines.is_empty() {
        return String::new();
    }
    let mut out = format!("{indentation}/**\n");
    for line in lines {
        if line.is_empty() {
            out.push_str(&format!("{indentation} *\n"));
        } else {
            out.push_str(&format!("{indentation} * {line}\n"));
        }
    }
    out.push_str(&format!("{indentation} */\n"));
    out
}

fn quote(text: &str) -> String {
    format!("'{}'", text.replace('\\', "\\\\").replace('\'', "\\'"))
}

fn escape_double_quoted(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('$', "\\$")
}

fn literal(value: &Value) -> String {
    match value {
        Value::Null => "null".into(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote(s),
        Value::Array(items) => format!(
            "[{}]",
            items.iter().map(literal).collect::<Vec<_>>().join(", ")
        ),
        Value::Object(map) => format!(
            "[{}]",
            map.iter()
                .map(|(key, value)| format!("{} => {}", quote(key), literal(value)))
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}
