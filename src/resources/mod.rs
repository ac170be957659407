// Support resource resolution and rendering

use crate::crisis::ResourceType;
use crate::data::Resource;

pub const NO_RESOURCE_NAME: &str = "No resource available";

/// First directory row of the requested type
///
/// `ResourceType::None` resolves to nothing. A type with no rows resolves to
/// a placeholder so the user still sees that a resource was intended.
pub fn resolve(resource_type: ResourceType, table: &[Resource]) -> Option<Resource> {
    if resource_type == ResourceType::None {
        return None;
    }

    let kind = resource_type.as_str();
    let resource = table
        .iter()
        .find(|row| row.kind == kind)
        .cloned()
        .unwrap_or_else(|| {
            tracing::warn!("No '{}' rows in the support directory", kind);
            placeholder(kind)
        });

    Some(resource)
}

fn placeholder(kind: &str) -> Resource {
    Resource {
        kind: kind.to_string(),
        name: NO_RESOURCE_NAME.to_string(),
        phone: String::new(),
        description: None,
    }
}

/// Reply text followed by the suggested resource block, if any
pub fn render_with_resource(reply: &str, resource: Option<&Resource>) -> String {
    let Some(resource) = resource else {
        return reply.to_string();
    };

    let mut rendered = format!(
        "{}\n\n### 📞 Suggested Resource:\n{} – {}",
        reply, resource.name, resource.phone
    );
    if let Some(description) = &resource.description {
        rendered.push('\n');
        rendered.push_str(description);
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(kind: &str, name: &str, phone: &str) -> Resource {
        Resource {
            kind: kind.to_string(),
            name: name.to_string(),
            phone: phone.to_string(),
            description: None,
        }
    }

    fn table() -> Vec<Resource> {
        vec![
            row("warmline", "Peer Warmline", "555-0100"),
            row("hotline", "988 Lifeline", "988"),
            row("hotline", "Second Hotline", "555-0199"),
        ]
    }

    #[test]
    fn test_resolve_first_matching_row() {
        let resource = resolve(ResourceType::Hotline, &table()).unwrap();
        assert_eq!(resource.kind, "hotline");
        assert_eq!(resource.name, "988 Lifeline");

        let resource = resolve(ResourceType::Warmline, &table()).unwrap();
        assert_eq!(resource.name, "Peer Warmline");
    }

    #[test]
    fn test_resolve_none() {
        assert!(resolve(ResourceType::None, &table()).is_none());
    }

    #[test]
    fn test_resolve_placeholder_when_type_absent() {
        let only_warm = vec![row("warmline", "Peer Warmline", "555-0100")];
        let resource = resolve(ResourceType::Hotline, &only_warm).unwrap();
        assert_eq!(resource.name, NO_RESOURCE_NAME);
        assert_eq!(resource.phone, "");
    }

    #[test]
    fn test_render_with_resource() {
        let resource = row("hotline", "988 Lifeline", "988");
        let rendered = render_with_resource("Please reach out.", Some(&resource));
        assert_eq!(
            rendered,
            "Please reach out.\n\n### 📞 Suggested Resource:\n988 Lifeline – 988"
        );
    }

    #[test]
    fn test_render_with_description() {
        let mut resource = row("warmline", "Peer Warmline", "555-0100");
        resource.description = Some("Open evenings".to_string());
        let rendered = render_with_resource("Hi", Some(&resource));
        assert!(rendered.ends_with("Peer Warmline – 555-0100\nOpen evenings"));
    }

    #[test]
    fn test_render_without_resource() {
        assert_eq!(render_with_resource("Hi", None), "Hi");
    }
}
