use crate::{
    tokenizer::Token,
    types::{Definition, DefinitionAttributes, DefinitionKind, Field, Schema, SchemaOptions},
    utils::{error, quote},
    error::KiwiError,
};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref IDENTIFIER:         Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
    static ref EQUALS:             Regex = Regex::new(r"^=$").unwrap();
    static ref SEMICOLON:          Regex = Regex::new(r"^;$").unwrap();
    static ref COMMA:              Regex = Regex::new(r"^,$").unwrap();
    static ref INTEGER:            Regex = Regex::new(r"^-?\d+$").unwrap();
    static ref LEFT_BRACE:         Regex = Regex::new(r"^\{$").unwrap();
    static ref RIGHT_BRACE:        Regex = Regex::new(r"^\}$").unwrap();
    static ref LEFT_BRACKET:       Regex = Regex::new(r"^\[$").unwrap();
    static ref RIGHT_BRACKET:      Regex = Regex::new(r"^\]$").unwrap();
    static ref ARRAY_TOKEN:        Regex = Regex::new(r"^\[\]$").unwrap();
    static ref BOOLEAN:            Regex = Regex::new(r"^(true|false)$").unwrap();
    static ref ENUM_KEYWORD:       Regex = Regex::new(r"^enum$").unwrap();
    static ref STRUCT_KEYWORD:     Regex = Regex::new(r"^struct$").unwrap();
    static ref MESSAGE_KEYWORD:    Regex = Regex::new(r"^message$").unwrap();
    static ref PACKAGE_KEYWORD:    Regex = Regex::new(r"^package$").unwrap();
    static ref OPTION_KEYWORD:     Regex = Regex::new(r"^option$").unwrap();
    static ref EXTENSIONS_KEYWORD: Regex = Regex::new(r"^extensions$").unwrap();
    static ref EOF:                Regex = Regex::new(r"^$").unwrap();
}

/// One `name` or `name = true|false` entry of a `[...]` attribute list.
struct Attribute<'t> {
    token: &'t Token,
    value: bool,
}

struct Parser<'t> {
    tokens: &'t [Token],
    index:  usize,
}

impl<'t> Parser<'t> {
    /// The tokenizer always appends an EOF token, so running past the end
    /// keeps returning it.
    fn current(&self) -> &'t Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.index.min(last)]
    }

    fn peek(&self, offset: usize) -> &'t Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[(self.index + offset).min(last)]
    }

    fn at_end(&self) -> bool {
        self.index + 1 >= self.tokens.len() || EOF.is_match(&self.current().text)
    }

    fn eat(&mut self, test: &Regex) -> bool {
        if test.is_match(&self.current().text) {
            self.index += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, test: &Regex, expected: &str) -> Result<&'t Token, KiwiError> {
        let tok = self.current();
        if !self.eat(test) {
            return Err(error(
                &format!("Expected {} but found {}", expected, quote(&tok.text)),
                tok.line,
                tok.column,
            ));
        }
        Ok(tok)
    }

    fn unexpected_token(&self) -> KiwiError {
        let tok = self.current();
        error(
            &format!("Unexpected token {}", quote(&tok.text)),
            tok.line,
            tok.column,
        )
    }

    fn boolean(&mut self) -> Result<bool, KiwiError> {
        let tok = self.expect(&BOOLEAN, "true or false")?;
        Ok(tok.text == "true")
    }

    /// Parses an optional `[a, b = false]` list.
    fn attributes(&mut self) -> Result<Vec<Attribute<'t>>, KiwiError> {
        let mut attributes = Vec::new();
        if !self.eat(&LEFT_BRACKET) {
            return Ok(attributes);
        }
        loop {
            let token = self.expect(&IDENTIFIER, "attribute name")?;
            let value = if self.eat(&EQUALS) { self.boolean()? } else { true };
            attributes.push(Attribute { token, value });
            if !self.eat(&COMMA) {
                break;
            }
        }
        self.expect(&RIGHT_BRACKET, "\"]\"")?;
        Ok(attributes)
    }
}

fn unknown_attribute(attribute: &Attribute) -> KiwiError {
    error(
        &format!("Unknown attribute {}", quote(&attribute.token.text)),
        attribute.token.line,
        attribute.token.column,
    )
}

/// Parses tokens produced by `tokenize_schema` into a `Schema`.
pub fn parse_schema(tokens: &[Token]) -> Result<Schema, KiwiError> {
    if tokens.is_empty() {
        return Err(error("Expected at least an EOF token", 0, 0));
    }

    let mut parser       = Parser { tokens, index: 0 };
    let mut definitions  = Vec::new();
    let mut options      = SchemaOptions::default();
    let mut package_text = None;

    if parser.eat(&PACKAGE_KEYWORD) {
        let pkg_tok = parser.expect(&IDENTIFIER, "identifier")?;
        package_text = Some(pkg_tok.text.clone());
        parser.expect(&SEMICOLON, "\";\"")?;
    }

    while !parser.at_end() {
        if parser.eat(&OPTION_KEYWORD) {
            parse_option(&mut parser, &mut options)?;
            continue;
        }

        let kind = if parser.eat(&ENUM_KEYWORD) {
            DefinitionKind::Enum
        } else if parser.eat(&STRUCT_KEYWORD) {
            DefinitionKind::Struct
        } else if parser.eat(&MESSAGE_KEYWORD) {
            DefinitionKind::Message
        } else {
            return Err(parser.unexpected_token());
        };

        definitions.push(parse_definition(&mut parser, kind)?);
    }

    Ok(Schema {
        package: package_text,
        options,
        definitions,
    })
}

fn parse_option(parser: &mut Parser, options: &mut SchemaOptions) -> Result<(), KiwiError> {
    let name = parser.expect(&IDENTIFIER, "option name")?;
    parser.expect(&EQUALS, "\"=\"")?;
    let value = parser.boolean()?;
    parser.expect(&SEMICOLON, "\";\"")?;

    match name.text.as_str() {
        "equal_all"          => options.equal_all = value,
        "verbose_equal_all"  => options.verbose_equal_all = value,
        "testgen_all"        => options.testgen_all = value,
        "extensions_map_all" => options.extensions_map_all = value,
        other => {
            return Err(error(
                &format!("Unknown option {}", quote(other)),
                name.line,
                name.column,
            ))
        }
    }
    Ok(())
}

fn parse_definition(parser: &mut Parser, kind: DefinitionKind) -> Result<Definition, KiwiError> {
    let name_tok = parser.expect(&IDENTIFIER, "identifier")?;

    let mut attributes = DefinitionAttributes::default();
    for attribute in parser.attributes()? {
        let slot = match attribute.token.text.as_str() {
            "equal"          => &mut attributes.equal,
            "verbose_equal"  => &mut attributes.verbose_equal,
            "testgen"        => &mut attributes.testgen,
            "extensions_map" => &mut attributes.extensions_map,
            _ => return Err(unknown_attribute(&attribute)),
        };
        *slot = Some(attribute.value);
    }

    parser.expect(&LEFT_BRACE, "\"{\"")?;

    let mut fields = Vec::new();
    let mut has_extensions = false;
    while !parser.eat(&RIGHT_BRACE) {
        if parser.at_end() {
            return Err(parser.unexpected_token());
        }

        if kind == DefinitionKind::Message
            && EXTENSIONS_KEYWORD.is_match(&parser.current().text)
            && SEMICOLON.is_match(&parser.peek(1).text)
        {
            parser.index += 2;
            has_extensions = true;
            continue;
        }

        fields.push(parse_field(parser, &kind, fields.len())?);
    }

    Ok(Definition {
        name:   name_tok.text.clone(),
        line:   name_tok.line,
        column: name_tok.column,
        kind,
        fields,
        attributes,
        has_extensions,
    })
}

fn parse_field(parser: &mut Parser, kind: &DefinitionKind, position: usize) -> Result<Field, KiwiError> {
    let mut type_opt = None;
    let mut is_array = false;

    if *kind != DefinitionKind::Enum {
        let t_tok = parser.expect(&IDENTIFIER, "identifier")?;
        if parser.eat(&ARRAY_TOKEN) {
            is_array = true;
        }
        type_opt = Some(t_tok.text.clone());
    }

    let f_tok = parser.expect(&IDENTIFIER, "identifier")?;

    // Structs number their fields in order; everything else is explicit.
    let value = if *kind != DefinitionKind::Struct {
        parser.expect(&EQUALS, "\"=\"")?;
        let v_tok = parser.expect(&INTEGER, "integer")?;
        v_tok.text.parse::<i32>().map_err(|_| {
            error(
                &format!("Invalid integer {}", quote(&v_tok.text)),
                v_tok.line,
                v_tok.column,
            )
        })?
    } else {
        position as i32 + 1
    };

    let mut is_deprecated = false;
    let mut is_group = false;
    for attribute in parser.attributes()? {
        match attribute.token.text.as_str() {
            "deprecated" => {
                if *kind != DefinitionKind::Message {
                    return Err(error(
                        "Cannot deprecate this field",
                        attribute.token.line,
                        attribute.token.column,
                    ));
                }
                is_deprecated = attribute.value;
            }
            "group" => is_group = attribute.value,
            _ => return Err(unknown_attribute(&attribute)),
        }
    }

    parser.expect(&SEMICOLON, "\";\"")?;

    Ok(Field {
        name:           f_tok.text.clone(),
        line:           f_tok.line,
        column:         f_tok.column,
        type_:          type_opt,
        is_array,
        is_deprecated,
        is_group,
        reserved_index: value,
    })
}
