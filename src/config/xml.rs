//! Webspace XML definition parsing.
//!
//! One XML file per webspace:
//!
//! ```xml
//! <webspace>
//!     <name>Blog</name>
//!     <key>blog</key>
//!     <localizations>
//!         <localization language="en" country="us" default="true"/>
//!         <localization language="de"/>
//!     </localizations>
//!     <segments>
//!         <segment key="winter" default="true">Winter</segment>
//!     </segments>
//!     <portals>
//!         <portal>
//!             <name>Blog Portal</name>
//!             <key>blog_portal</key>
//!             <environments>
//!                 <environment type="prod">
//!                     <url language="en" country="us" main="true">blog.example.com</url>
//!                     <url>{language}.example.com/{segment}</url>
//!                 </environment>
//!             </environments>
//!         </portal>
//!     </portals>
//! </webspace>
//! ```
//!
//! Structural XML problems surface as [`ConfigError::Xml`]; semantic issues
//! (bad locale, invalid key) are collected as diagnostics so that a whole
//! directory of definitions can be reported in one pass.

use std::fs;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::config::types::{ConfigDiagnostics, ConfigError, FieldPath};
use crate::config::webspace::{
    Environment, Portal, Segment, UrlDefinition, Webspace, WebspaceLocalization, validate_webspace,
};
use crate::core::Locale;

/// Which simple text element is currently open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextTarget {
    None,
    Name,
    Key,
}

/// Event-loop state while walking one `<webspace>` document.
struct WebspaceParser<'a> {
    origin: String,
    diag: &'a mut ConfigDiagnostics,

    key: String,
    name: String,
    localizations: Vec<WebspaceLocalization>,
    segments: Vec<Segment>,
    portals: Vec<Portal>,

    portal: Option<Portal>,
    environment: Option<Environment>,
    url: Option<UrlDefinition>,
    segment: Option<Segment>,
    text_target: TextTarget,
}

impl<'a> WebspaceParser<'a> {
    fn new(origin: &str, diag: &'a mut ConfigDiagnostics) -> Self {
        Self {
            origin: origin.to_string(),
            diag,
            key: String::new(),
            name: String::new(),
            localizations: Vec::new(),
            segments: Vec::new(),
            portals: Vec::new(),
            portal: None,
            environment: None,
            url: None,
            segment: None,
            text_target: TextTarget::None,
        }
    }

    fn field(&self, sub: &str) -> FieldPath {
        FieldPath::new(format!("{}: {}", self.origin, sub))
    }

    fn xml_err(&self, err: impl std::fmt::Display) -> ConfigError {
        ConfigError::Xml(self.origin.clone().into(), err.to_string())
    }

    /// Collect the element attributes as owned (name, value) pairs.
    fn attributes(&self, element: &BytesStart<'_>) -> Result<Vec<(String, String)>, ConfigError> {
        let mut pairs = Vec::new();
        for attr in element.attributes() {
            let attr = attr.map_err(|e| self.xml_err(e))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| self.xml_err(e))?
                .into_owned();
            pairs.push((key, value));
        }
        Ok(pairs)
    }

    fn on_open(&mut self, element: &BytesStart<'_>) -> Result<(), ConfigError> {
        match element.name().as_ref() {
            b"name" => self.text_target = TextTarget::Name,
            b"key" => self.text_target = TextTarget::Key,
            b"localization" => self.on_localization(element)?,
            b"segment" => self.on_segment(element)?,
            b"portal" => {
                self.portal = Some(Portal {
                    key: String::new(),
                    name: String::new(),
                    localizations: Vec::new(),
                    environments: Vec::new(),
                });
            }
            b"environment" => self.on_environment(element)?,
            b"url" => self.on_url(element)?,
            // webspace/localizations/segments/portals/environments containers
            _ => {}
        }
        Ok(())
    }

    fn on_close(&mut self, name: &[u8]) {
        match name {
            b"name" | b"key" => self.text_target = TextTarget::None,
            b"segment" => {
                if let Some(segment) = self.segment.take() {
                    self.segments.push(segment);
                }
            }
            b"url" => self.finish_url(),
            b"environment" => {
                if let Some(environment) = self.environment.take()
                    && let Some(portal) = self.portal.as_mut()
                {
                    portal.environments.push(environment);
                }
            }
            b"portal" => {
                if let Some(portal) = self.portal.take() {
                    self.portals.push(portal);
                }
            }
            _ => {}
        }
    }

    fn on_text(&mut self, text: &str) {
        if let Some(url) = self.url.as_mut() {
            url.pattern.push_str(text);
        } else if let Some(segment) = self.segment.as_mut() {
            segment.title = Some(match segment.title.take() {
                Some(mut title) => {
                    title.push_str(text);
                    title
                }
                None => text.to_string(),
            });
        } else {
            let slot = match (self.text_target, self.portal.as_mut()) {
                (TextTarget::Name, Some(portal)) => &mut portal.name,
                (TextTarget::Key, Some(portal)) => &mut portal.key,
                (TextTarget::Name, None) => &mut self.name,
                (TextTarget::Key, None) => &mut self.key,
                (TextTarget::None, _) => return,
            };
            slot.push_str(text);
        }
    }

    fn on_localization(&mut self, element: &BytesStart<'_>) -> Result<(), ConfigError> {
        let mut language = None;
        let mut country = None;
        let mut default = false;

        for (key, value) in self.attributes(element)? {
            match key.as_str() {
                "language" => language = Some(value),
                "country" => country = Some(value),
                "default" => default = value == "true",
                _ => {}
            }
        }

        let field = self.field("localizations");

        let Some(language) = language else {
            self.diag
                .error(field, "localization is missing its language attribute");
            return Ok(());
        };

        let raw = match country {
            Some(country) => format!("{language}_{country}"),
            None => language,
        };

        let locale = match Locale::parse(&raw) {
            Ok(locale) => locale,
            Err(err) => {
                self.diag.error(field, err.to_string());
                return Ok(());
            }
        };

        if let Some(portal) = self.portal.as_mut() {
            portal.localizations.push(locale);
        } else {
            self.localizations
                .push(WebspaceLocalization { locale, default });
        }
        Ok(())
    }

    fn on_segment(&mut self, element: &BytesStart<'_>) -> Result<(), ConfigError> {
        let mut segment = Segment {
            key: String::new(),
            title: None,
            default: false,
        };
        for (key, value) in self.attributes(element)? {
            match key.as_str() {
                "key" => segment.key = value,
                "default" => segment.default = value == "true",
                _ => {}
            }
        }
        self.segment = Some(segment);
        Ok(())
    }

    fn on_environment(&mut self, element: &BytesStart<'_>) -> Result<(), ConfigError> {
        let mut kind = String::new();
        for (key, value) in self.attributes(element)? {
            if key == "type" {
                kind = value;
            }
        }
        self.environment = Some(Environment {
            kind,
            urls: Vec::new(),
        });
        Ok(())
    }

    fn on_url(&mut self, element: &BytesStart<'_>) -> Result<(), ConfigError> {
        let mut url = UrlDefinition::new("");
        for (key, value) in self.attributes(element)? {
            match key.as_str() {
                "language" => url.language = Some(value),
                "country" => url.country = Some(value),
                "segment" => url.segment = Some(value),
                "redirect" => url.redirect = Some(value),
                "main" => url.main = value == "true",
                _ => {}
            }
        }
        self.url = Some(url);
        Ok(())
    }

    fn finish_url(&mut self) {
        if let Some(url) = self.url.take()
            && let Some(environment) = self.environment.as_mut()
        {
            environment.urls.push(url);
        }
    }

    fn finish(self) -> Webspace {
        Webspace {
            key: self.key,
            name: self.name,
            localizations: self.localizations,
            segments: self.segments,
            portals: self.portals,
        }
    }
}

/// Parse one webspace definition from an XML string.
///
/// `origin` names the source file for diagnostics. Semantic problems are
/// pushed onto `diag`; only structural XML failures are returned as `Err`.
pub fn parse_webspace(
    content: &str,
    origin: &str,
    diag: &mut ConfigDiagnostics,
) -> Result<Webspace, ConfigError> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut parser = WebspaceParser::new(origin, diag);

    loop {
        match reader.read_event() {
            Ok(Event::Start(element)) => parser.on_open(&element)?,
            Ok(Event::Empty(element)) => {
                // Self-closing elements open and close in one event
                parser.on_open(&element)?;
                parser.on_close(element.name().as_ref());
            }
            Ok(Event::End(element)) => parser.on_close(element.name().as_ref()),
            Ok(Event::Text(text)) => {
                let decoded = text.decode().map_err(|e| parser.xml_err(e))?;
                let text = quick_xml::escape::unescape(&decoded).map_err(|e| parser.xml_err(e))?;
                parser.on_text(&text);
            }
            Ok(Event::Eof) => break,
            Err(err) => {
                return Err(ConfigError::Xml(origin.into(), err.to_string()));
            }
            _ => {}
        }
    }

    Ok(parser.finish())
}

/// Load and validate a webspace definition file.
pub fn load_webspace_file(
    path: &Path,
    diag: &mut ConfigDiagnostics,
) -> Result<Webspace, ConfigError> {
    let content =
        fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

    let origin = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned());

    let webspace = parse_webspace(&content, &origin, diag)?;
    validate_webspace(&webspace, &origin, diag);
    Ok(webspace)
}

// ============================================================================
// tests
// ============================================================================
