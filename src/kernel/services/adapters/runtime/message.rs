use crate::kernel::virtual_doc::CombinedUri;

#[derive(Debug)]
pub enum AppMessage {
    /// Raw join of the parts as they were on disk when the load ran.
    CombinedContent { uri: CombinedUri, content: String },
}
