use crate::assert_err;
use crate::nn::layer::Identity;
use crate::nn::{LayerError, LayerOptions, Module};
use crate::tensor::Tensor;

#[test]
fn test_identity_passes_input_through() {
    let layer = Identity::default();
    let x = Tensor::new(&[1., -2., 3.], &[1, 3]);
    assert_eq!(layer.forward(&x).unwrap(), x);
    assert_eq!(layer.name(), "identity");
    assert_eq!(layer.num_params(), 0);
}

#[test]
fn test_identity_options() {
    let layer = Identity::new(&LayerOptions::default().with_name("skip")).unwrap();
    assert_eq!(layer.name(), "skip");
    assert_err!(
        Identity::new(&LayerOptions::default().with_use_bias(false)),
        LayerError::UnsupportedOption {
            layer: "Identity",
            option: "use_bias"
        }
    );
}
