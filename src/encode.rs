use alloc::vec::Vec;

/// A type that can be encoded into a sequence of bytes.
pub trait Encode {
    /// Returns the number of bytes this value will take when encoded.
    fn size(&self) -> usize;

    /// Encodes this instance into the provided byte slice.
    ///
    /// `data` must be at least [`Encode::size`] bytes long.
    fn encode(&self, data: &mut [u8]);

    /// Encodes this instance into a freshly allocated buffer.
    fn to_bytes(&self) -> Vec<u8> {
        let mut data = alloc::vec![0; self.size()];
        self.encode(&mut data);
        data
    }
}

// The AirHome wire format is big-endian throughout.
macro_rules! impl_encode_for_primitive {
    ($($t:ty),*) => {
        $(
            impl Encode for $t {
                fn size(&self) -> usize {
                    size_of::<Self>()
                }

                fn encode(&self, data: &mut [u8]) {
                    data[..size_of::<Self>()].copy_from_slice(&self.to_be_bytes());
                }
            }
        )*
    };
}

impl_encode_for_primitive!(u8, u16, u32, u64);

impl Encode for &[u8] {
    fn size(&self) -> usize {
        self.len()
    }

    fn encode(&self, data: &mut [u8]) {
        data[..self.len()].copy_from_slice(self);
    }
}

impl<const N: usize> Encode for [u8; N] {
    fn size(&self) -> usize {
        N
    }

    fn encode(&self, data: &mut [u8]) {
        data[..N].copy_from_slice(self);
    }
}

impl Encode for Vec<u8> {
    fn size(&self) -> usize {
        self.len()
    }

    fn encode(&self, data: &mut [u8]) {
        self.as_slice().encode(data)
    }
}

/// Writes a sequence of [`Encode`] values back to back into a byte slice.
pub struct MessageEncoder<'a> {
    data: &'a mut [u8],
    position: usize,
}

impl<'a> MessageEncoder<'a> {
    /// Creates an encoder that starts writing at the beginning of `data`.
    pub fn new(data: &'a mut [u8]) -> Self {
        Self::new_with_position(data, 0)
    }

    /// Creates an encoder that starts writing at `position`.
    pub fn new_with_position(data: &'a mut [u8], position: usize) -> Self {
        Self { data, position }
    }

    /// Encodes `value` at the current position and advances past it.
    pub fn write<T: Encode + ?Sized>(&mut self, value: &T) {
        let size = value.size();
        value.encode(&mut self.data[self.position..self.position + size]);
        self.position += size;
    }

    /// Number of bytes written so far, including the starting offset.
    pub fn position(&self) -> usize {
        self.position
    }
}
