use crate::util::NumTrait;
use rayon::prelude::*;

/// Sets each element to the same value.
/// `chunk_size` is break the work into tasks for multi-threading.
pub fn set_value<NumType: NumTrait>(
    a_slice: &mut [NumType],
    value: NumType,
    chunk_size: usize,
) {
    a_slice
        .par_chunks_mut(chunk_size.max(1))
        .for_each(|a_chunk: &mut [NumType]| {
            for a in a_chunk {
                *a = value;
            }
        });
}

/// Copy `src` into `dst`, both must have the same length.
pub fn copy<NumType: NumTrait>(
    src: &[NumType],
    dst: &mut [NumType],
    chunk_size: usize,
) {
    debug_assert_eq!(src.len(), dst.len());
    let chunk_size = chunk_size.max(1);
    dst.par_chunks_mut(chunk_size)
        .zip(src.par_chunks(chunk_size))
        .for_each(|(d_chunk, s_chunk)| {
            d_chunk.copy_from_slice(s_chunk);
        });
}

/// Set each element from its linear index.
pub fn set_from_index<NumType: NumTrait, F>(
    a_slice: &mut [NumType],
    f: F,
    chunk_size: usize,
) where
    F: Fn(usize) -> NumType + Send + Sync,
{
    let chunk_size = chunk_size.max(1);
    a_slice.par_chunks_mut(chunk_size).enumerate().for_each(
        |(i, a_chunk): (usize, &mut [NumType])| {
            let offset = i * chunk_size;
            for (l, a) in a_chunk.iter_mut().enumerate() {
                *a = f(offset + l);
            }
        },
    );
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn set_values_test() {
        {
            let mut a = vec![0, 1, 2, 3, 4, 5];
            set_value(&mut a, 7, 6);
            for v in a {
                assert_eq!(v, 7);
            }
        }

        {
            let n = 1000;
            let chunk_size = 10;
            let value = n + 1;
            let mut a = Vec::with_capacity(n);
            for i in 0..n {
                a.push(i);
            }

            set_value(&mut a, value, chunk_size);

            for v in a {
                assert_eq!(v, value);
            }
        }
    }

    #[test]
    fn copy_test() {
        let src: Vec<f64> = (0..1001).map(|i| i as f64 * 0.5).collect();
        let mut dst = vec![0.0; src.len()];
        copy(&src, &mut dst, 64);
        assert_eq!(src, dst);
    }

    #[test]
    fn set_from_index_test() {
        let mut a = vec![0usize; 103];
        set_from_index(&mut a, |l| 2 * l, 10);
        for (l, v) in a.iter().enumerate() {
            assert_eq!(*v, 2 * l);
        }
    }
}
