pub mod client;
pub mod markup;
pub mod server;
pub mod types;

pub use markup::Element;

pub trait TryFromElement {
    fn try_from_element(el: &Element) -> anyhow::Result<Self>
    where
        Self: Sized;
}

pub trait ToElement {
    const TAG: &'static str;

    fn write_attrs(&self, el: Element) -> Element {
        el
    }

    fn to_element(&self) -> Element {
        self.write_attrs(Element::new(Self::TAG))
    }

    fn to_markup(&self) -> String {
        self.to_element().to_string()
    }
}
